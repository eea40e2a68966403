// ABOUTME: Route handlers for exercises within a category
// ABOUTME: Exercises carry the variations an activity may choose from
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
use planner_core::models::ExerciseRequest;
use std::sync::Arc;

/// Exercise routes implementation
pub struct ExercisesRoutes;

impl ExercisesRoutes {
    /// Create all exercise routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/categories/:id/exercises",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/exercises/:id",
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
        let category_id = path_param(path)?;
        let exercises = resources
            .database
            .exercises()
            .list_for_category(category_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(exercises)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<ExerciseRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let category_id = path_param(path)?;
        let request = json_body(body)?;

        let exercise = resources
            .database
            .exercises()
            .create(category_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(exercise)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let exercise_id = path_param(path)?;
        let exercise = resources
            .database
            .exercises()
            .get(exercise_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<ExerciseRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let exercise_id = path_param(path)?;
        let request = json_body(body)?;

        let exercise = resources
            .database
            .exercises()
            .update(exercise_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let exercise_id = path_param(path)?;
        resources
            .database
            .exercises()
            .delete(exercise_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
