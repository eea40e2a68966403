// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Validation limits, defaults, and reference data for the Season Planner service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Constants module
//!
//! Constants are grouped by domain rather than kept in a single flat list.

/// Field limits enforced on every create and update request
pub mod limits {
    /// Maximum length of names (team, coach, category, exercise, role)
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Maximum length of free-text notes and descriptions
    pub const MAX_NOTES_LENGTH: usize = 500;
    /// Shortest allowed activity in minutes
    pub const MIN_ACTIVITY_MINUTES: u32 = 1;
    /// Longest allowed activity in minutes (10 hours)
    pub const MAX_ACTIVITY_MINUTES: u32 = 600;
    /// Earliest plan year
    pub const MIN_PLAN_YEAR: i32 = 2020;
    /// Latest plan year
    pub const MAX_PLAN_YEAR: i32 = 2099;
    /// First week number in a plan
    pub const MIN_WEEK_NUMBER: u32 = 1;
    /// Last week number in a plan (ISO years have up to 53 weeks)
    pub const MAX_WEEK_NUMBER: u32 = 53;
    /// Longest plan in weeks
    pub const MAX_PLAN_WEEKS: u32 = 53;
    /// Smallest combined group
    pub const MIN_COMBINED_GROUP_SIZE: usize = 2;
    /// Largest accepted request body
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
}

/// Defaults applied when a request omits an optional field
pub mod defaults {
    /// A season-long plan
    pub const PLAN_DURATION_WEEKS: u32 = 52;
    /// Bucket name for activities without a category
    pub const UNKNOWN_CATEGORY: &str = "Unknown";
    /// Bucket name for activities without an exercise
    pub const UNKNOWN_EXERCISE: &str = "Unknown";
}

/// Reference data seeded into every database
pub mod reference {
    /// Standard categories visible to all users
    pub const STANDARD_CATEGORIES: [&str; 3] = ["Technical", "Tactical", "Physical"];
}

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Readiness endpoint
    pub const READY_CHECK: &str = "/ready";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8080;
}

/// Authentication defaults for tokens issued by the hosted auth provider
pub mod auth {
    /// Audience claim carried by user access tokens
    pub const DEFAULT_AUDIENCE: &str = "authenticated";
    /// Path appended to the provider URL to form the issuer
    pub const ISSUER_PATH: &str = "/auth/v1";
    /// Expiry used when this service signs tokens for tooling and tests
    pub const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 1;
}

/// Service identification
pub mod service_names {
    /// Name used in logs and the health endpoint
    pub const SEASON_PLANNER: &str = "season-planner";
}
