// ABOUTME: Route handlers for season plans (macrocycles)
// ABOUTME: Creating a plan generates its weeks; reading one returns the nested hierarchy with totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Plan routes
//!
//! A plan is the root of the hierarchy. `GET /api/macrocycles/:id` returns the
//! plan with every week, session, and activity beneath it, each level carrying
//! its real-duration total.

use super::{authenticate, json_body, path_param};
use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use planner_core::models::{CreatePlanRequest, Plan, UpdatePlanRequest, Week};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response for a newly created plan
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedPlanResponse {
    /// The plan
    #[serde(flatten)]
    pub plan: Plan,
    /// Weeks generated for it
    pub weeks: Vec<Week>,
}

/// Plan routes implementation
pub struct PlansRoutes;

impl PlansRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/macrocycles",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/macrocycles/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let plans = resources.database.plans().list(auth.user_id).await?;
        Ok((StatusCode::OK, Json(plans)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<CreatePlanRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let request = json_body(body)?;

        let (plan, weeks) = resources
            .database
            .plans()
            .create_with_weeks(auth.user_id, &request)
            .await?;

        Ok((StatusCode::CREATED, Json(CreatedPlanResponse { plan, weeks })).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let plan_id = path_param(path)?;
        let details = resources
            .database
            .hierarchy()
            .plan_details(plan_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(details)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<UpdatePlanRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let plan_id = path_param(path)?;
        let request = json_body(body)?;

        let plan = resources
            .database
            .plans()
            .update(plan_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let plan_id = path_param(path)?;
        resources
            .database
            .plans()
            .delete(plan_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
