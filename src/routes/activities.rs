// ABOUTME: Route handlers for activities inside a training session
// ABOUTME: Creation may combine the new activity with existing ones via combine_with
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
use planner_core::models::{CreateActivityRequest, UpdateActivityRequest};
use std::sync::Arc;

/// Activity routes implementation
pub struct ActivitiesRoutes;

impl ActivitiesRoutes {
    /// Create all activity routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/trainingsessions/:id/activities",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/activities/:id",
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
        let activities = resources
            .database
            .activities()
            .list_for_session(session_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(activities)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<CreateActivityRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let session_id = path_param(path)?;
        let request = json_body(body)?;

        let activity = resources
            .database
            .activities()
            .create(session_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(activity)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let activity_id = path_param(path)?;
        let activity = resources
            .database
            .activities()
            .get(activity_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(activity)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<UpdateActivityRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let activity_id = path_param(path)?;
        let request = json_body(body)?;

        let activity = resources
            .database
            .activities()
            .update(activity_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(activity)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let activity_id = path_param(path)?;
        resources
            .database
            .activities()
            .delete(activity_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
