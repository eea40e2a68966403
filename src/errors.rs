// ABOUTME: Error types for the server crate, shared with the core crate
// ABOUTME: Re-exports AppError, ErrorCode, and AppResult so handlers use one error type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Unified error handling
//!
//! Errors are defined in `planner-core` so the analytics crate and the
//! server report the same codes; the HTTP rendering lives behind the core
//! crate's `http-response` feature.

pub use planner_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
};
