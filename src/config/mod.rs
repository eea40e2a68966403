// ABOUTME: Configuration management module for server settings
// ABOUTME: Re-exports the environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Configuration module for the Season Planner server

/// Environment and server configuration
pub mod environment;

pub use environment::{AuthConfig, CorsConfig, DatabaseUrl, Environment, ServerConfig};
