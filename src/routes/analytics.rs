// ABOUTME: Route handlers for plan analytics, category drilldowns, and session summaries
// ABOUTME: Loads the plan subtree once and hands it to the analytics rollups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Analytics routes
//!
//! Everything here is computed on read from the stored hierarchy. The plan
//! overview accepts `?month=YYYY-MM` to restrict the rollup to one month.

use super::{authenticate, path_param};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use planner_analytics::{category_drilldown, month_key, plan_overview, session_summary};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for the plan overview
#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    /// Restrict to one calendar month, `YYYY-MM`
    pub month: Option<String>,
}

/// Validate a `YYYY-MM` month filter
///
/// # Errors
///
/// Returns `InvalidFormat` unless `month` is a real month in `YYYY-MM` form
pub fn parse_month(month: &str) -> AppResult<String> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .ok()
        .map(month_key)
        .filter(|key| key == month)
        .ok_or_else(|| {
            AppError::invalid_format(format!("month must be YYYY-MM, got '{month}'"))
                .with_details(serde_json::json!({ "field": "month" }))
        })
}

/// Analytics routes implementation
pub struct AnalyticsRoutes;

impl AnalyticsRoutes {
    /// Create all analytics routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/macrocycles/:id/analytics", get(Self::handle_overview))
            .route(
                "/api/macrocycles/:id/analytics/categories/:name",
                get(Self::handle_category),
            )
            .route(
                "/api/trainingsessions/:id/summary",
                get(Self::handle_session_summary),
            )
            .with_state(resources)
    }

    async fn handle_overview(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        Query(query): Query<OverviewQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let plan_id = path_param(path)?;
        let month = query.month.as_deref().map(parse_month).transpose()?;

        let mut sessions = resources
            .database
            .hierarchy()
            .plan_sessions(plan_id, auth.user_id)
            .await?;
        if let Some(month) = month {
            sessions.retain(|s| month_key(s.session.date) == month);
        }

        Ok((StatusCode::OK, Json(plan_overview(&sessions))).into_response())
    }

    async fn handle_category(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<(i64, String)>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let (plan_id, category) = path_param(path)?;
        let sessions = resources
            .database
            .hierarchy()
            .plan_sessions(plan_id, auth.user_id)
            .await?;

        let drilldown = category_drilldown(&category, &sessions);
        Ok((StatusCode::OK, Json(drilldown)).into_response())
    }

    async fn handle_session_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let session_id = path_param(path)?;
        let activities = resources
            .database
            .activities()
            .list_for_session(session_id, auth.user_id)
            .await?;

        Ok((StatusCode::OK, Json(session_summary(&activities))).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_month_accepts_canonical_form() {
        assert_eq!(parse_month("2025-03").unwrap(), "2025-03");
    }

    #[test]
    fn test_parse_month_rejects_other_forms() {
        for bad in ["2025-3", "2025-13", "march", "2025-03-01", ""] {
            let error = parse_month(bad).unwrap_err();
            assert_eq!(error.code, ErrorCode::InvalidFormat, "{bad}");
        }
    }
}
