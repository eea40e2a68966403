// ABOUTME: Route handlers for combined activity groups within a session
// ABOUTME: Groups are addressed by UUID and always hold at least two activities
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
use planner_core::models::CombinedGroupRequest;
use std::sync::Arc;
use uuid::Uuid;

/// Combined group routes implementation
pub struct CombinedGroupsRoutes;

impl CombinedGroupsRoutes {
    /// Create all combined group routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/trainingsessions/:id/combined-groups",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/combined-groups/:id",
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
        let session_id = path_param(path)?;
        let groups = resources
            .database
            .combined_groups()
            .list_for_session(session_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(groups)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<CombinedGroupRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let session_id = path_param(path)?;
        let request = json_body(body)?;

        let group = resources
            .database
            .combined_groups()
            .create(session_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(group)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let group_id = path_param(path)?;
        let group = resources
            .database
            .combined_groups()
            .get(group_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(group)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<Uuid>, PathRejection>,
        body: Result<Json<CombinedGroupRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let group_id = path_param(path)?;
        let request = json_body(body)?;

        let group = resources
            .database
            .combined_groups()
            .update(group_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(group)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<Uuid>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let group_id = path_param(path)?;
        resources
            .database
            .combined_groups()
            .delete(group_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
