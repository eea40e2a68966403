// ABOUTME: Route handlers for training sessions within a week
// ABOUTME: Reading a single session returns its activities and real duration
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
use planner_core::models::SessionRequest;
use std::sync::Arc;

/// Training session routes implementation
pub struct SessionsRoutes;

impl SessionsRoutes {
    /// Create all training session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/microcycles/:id/trainingsessions",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/trainingsessions/:id",
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
        let week_id = path_param(path)?;
        let sessions = resources
            .database
            .sessions()
            .list_for_week(week_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(sessions)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<SessionRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let week_id = path_param(path)?;
        let request = json_body(body)?;

        let session = resources
            .database
            .sessions()
            .create(week_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let session_id = path_param(path)?;
        let details = resources
            .database
            .hierarchy()
            .session_details(session_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(details)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<SessionRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let session_id = path_param(path)?;
        let request = json_body(body)?;

        let session = resources
            .database
            .sessions()
            .update(session_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let session_id = path_param(path)?;
        resources
            .database
            .sessions()
            .delete(session_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
