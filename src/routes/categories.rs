// ABOUTME: Route handlers for the activity category catalog
// ABOUTME: Lists standard and user-owned categories, optionally with their exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Category routes
//!
//! `GET /api/categories?include=exercises` nests each category's exercises
//! in the listing. Standard categories are visible to everyone and read-only.

use super::{authenticate, json_body, path_param};
use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use planner_core::models::CategoryRequest;
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for listing categories
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesQuery {
    /// `exercises` to nest exercises under each category
    pub include: Option<String>,
}

impl ListCategoriesQuery {
    fn wants_exercises(&self) -> bool {
        self.include
            .as_deref()
            .is_some_and(|include| include.split(',').any(|part| part.trim() == "exercises"))
    }
}

/// Category routes implementation
pub struct CategoriesRoutes;

impl CategoriesRoutes {
    /// Create all category routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/categories",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/categories/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListCategoriesQuery>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let categories = resources.database.categories();

        if query.wants_exercises() {
            let nested = categories.list_with_exercises(auth.user_id).await?;
            return Ok((StatusCode::OK, Json(nested)).into_response());
        }
        let flat = categories.list(auth.user_id).await?;
        Ok((StatusCode::OK, Json(flat)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<Json<CategoryRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let request = json_body(body)?;

        let category = resources
            .database
            .categories()
            .create(auth.user_id, &request)
            .await?;
        Ok((StatusCode::CREATED, Json(category)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let category_id = path_param(path)?;
        let category = resources
            .database
            .categories()
            .get(category_id, auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(category)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<CategoryRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let category_id = path_param(path)?;
        let request = json_body(body)?;

        let category = resources
            .database
            .categories()
            .update(category_id, auth.user_id, &request)
            .await?;
        Ok((StatusCode::OK, Json(category)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let category_id = path_param(path)?;
        resources
            .database
            .categories()
            .delete(category_id, auth.user_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_parsing() {
        let none = ListCategoriesQuery::default();
        assert!(!none.wants_exercises());

        let exercises = ListCategoriesQuery {
            include: Some("exercises".to_owned()),
        };
        assert!(exercises.wants_exercises());

        let listed = ListCategoriesQuery {
            include: Some("owner, exercises".to_owned()),
        };
        assert!(listed.wants_exercises());

        let other = ListCategoriesQuery {
            include: Some("owner".to_owned()),
        };
        assert!(!other.wants_exercises());
    }
}
