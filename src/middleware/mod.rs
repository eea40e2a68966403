// ABOUTME: HTTP middleware for authentication, CORS, and request tracing
// ABOUTME: Provides bearer token checks, origin policy, and per-request spans with request ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

/// Bearer token authentication
pub mod auth;
/// Cross-origin policy
pub mod cors;
/// Request spans and request id propagation
pub mod tracing;

pub use auth::AuthMiddleware;
pub use cors::setup_cors;
pub use self::tracing::{make_request_span, RequestIdGenerator, REQUEST_ID_HEADER};
