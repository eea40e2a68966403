// ABOUTME: Route handlers for team roles reference data
// ABOUTME: Roles are global; any signed-in user may read or edit them
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
use planner_core::models::RoleRequest;
use std::sync::Arc;

/// Role routes implementation
pub struct RolesRoutes;

impl RolesRoutes {
    /// Create all role routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/roles",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/roles/:id",
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
        authenticate(&headers, &resources)?;
        let roles = resources.database.roles().list().await?;
        Ok((StatusCode::OK, Json(roles)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<RoleRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;
        let request = json_body(body)?;
        let role = resources.database.roles().create(&request).await?;
        Ok((StatusCode::CREATED, Json(role)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;
        let role_id = path_param(path)?;
        let role = resources.database.roles().get(role_id).await?;
        Ok((StatusCode::OK, Json(role)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<RoleRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;
        let role_id = path_param(path)?;
        let request = json_body(body)?;
        let role = resources.database.roles().update(role_id, &request).await?;
        Ok((StatusCode::OK, Json(role)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        authenticate(&headers, &resources)?;
        let role_id = path_param(path)?;
        resources.database.roles().delete(role_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
