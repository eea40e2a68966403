// ABOUTME: HTTP route modules for the plan hierarchy, reference data, and analytics
// ABOUTME: Shares request authentication and JSON body handling across handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! # Routes
//!
//! One `XRoutes` struct per resource, each returning an axum `Router` with
//! the shared `ServerResources` state applied. Every `/api` handler starts by
//! authenticating the bearer token, then delegates to a database manager
//! that enforces ownership.

/// Activity endpoints
pub mod activities;
/// Plan and category analytics endpoints
pub mod analytics;
/// Category endpoints
pub mod categories;
/// Combined group endpoints
pub mod combined_groups;
/// Exercise endpoints
pub mod exercises;
/// Liveness and readiness probes
pub mod health;
/// Plan (macrocycle) endpoints
pub mod plans;
/// Role endpoints
pub mod roles;
/// Training session endpoints
pub mod sessions;
/// Week (microcycle) endpoints
pub mod weeks;

pub use activities::ActivitiesRoutes;
pub use analytics::AnalyticsRoutes;
pub use categories::CategoriesRoutes;
pub use combined_groups::CombinedGroupsRoutes;
pub use exercises::ExercisesRoutes;
pub use health::HealthRoutes;
pub use plans::PlansRoutes;
pub use roles::RolesRoutes;
pub use sessions::SessionsRoutes;
pub use weeks::WeeksRoutes;

use crate::auth::AuthResult;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::http::HeaderMap;
use axum::Json;

/// Resolve the caller from the Authorization header
pub(crate) fn authenticate(
    headers: &HeaderMap,
    resources: &ServerResources,
) -> AppResult<AuthResult> {
    resources.auth_middleware.authenticate_headers(headers)
}

/// Unwrap a JSON body, reporting malformed input in the standard error shape
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_format(rejection.body_text()))
}

/// Unwrap path parameters, reporting a malformed id in the standard error shape
pub(crate) fn path_param<T>(path: Result<Path<T>, PathRejection>) -> AppResult<T> {
    path.map(|Path(value)| value)
        .map_err(|rejection| AppError::invalid_format(rejection.body_text()))
}
