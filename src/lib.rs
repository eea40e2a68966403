// ABOUTME: Main library entry point for the Season Planner API
// ABOUTME: Wires configuration, storage, authentication, and HTTP routes for training plan management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

#![deny(unsafe_code)]

//! # Season Planner
//!
//! A REST API for coaches planning a season of training. A season plan
//! (macrocycle) is split into weeks (microcycles), each week holds dated
//! training sessions, and each session holds timed activities drawn from a
//! catalog of categories and exercises.
//!
//! ## Features
//!
//! - **Plan hierarchy**: plans, weeks, sessions, and activities, each owned by one user
//! - **Real duration**: activities run in parallel are counted once via combined groups
//! - **Catalog**: standard categories shared by everyone plus per-user categories and exercises
//! - **Analytics**: monthly, period, and per-category rollups of a plan
//!
//! ## Architecture
//!
//! - **Config**: environment-driven server configuration
//! - **Database**: `SQLite` storage with one manager per entity
//! - **Auth**: verification of tokens issued by the hosted auth provider
//! - **Routes**: `axum` handlers grouped per entity
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use season_planner::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Season Planner configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Token verification for the hosted auth provider
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// `SQLite` storage and per-entity managers
pub mod database;

/// Error types shared by every layer
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Authentication, CORS, and request tracing middleware
pub mod middleware;

/// Shared server state
pub mod resources;

/// `HTTP` route handlers
pub mod routes;

/// Router assembly and serving
pub mod server;
