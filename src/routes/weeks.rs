// ABOUTME: Route handlers for plan weeks (microcycles)
// ABOUTME: Lists and adds weeks under a plan and reads a week with its sessions and totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

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
use planner_core::models::WeekRequest;
use std::sync::Arc;

/// Week routes implementation
pub struct WeeksRoutes;

impl WeeksRoutes {
    /// Create all week routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/macrocycles/:id/microcycles",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/microcycles/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let plan_id = path_param(path)?;
        let weeks = resources
            .database
            .weeks()
            .list_for_plan(plan_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(weeks)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<WeekRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let plan_id = path_param(path)?;
        let request = json_body(body)?;

        let week = resources
            .database
            .weeks()
            .create(plan_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(week)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let week_id = path_param(path)?;
        let details = resources
            .database
            .hierarchy()
            .week_details(week_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(details)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<WeekRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let week_id = path_param(path)?;
        let request = json_body(body)?;

        let week = resources
            .database
            .weeks()
            .update(week_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(week)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let week_id = path_param(path)?;
        resources
            .database
            .weeks()
            .delete(week_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
