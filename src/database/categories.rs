// ABOUTME: Database operations for activity categories
// ABOUTME: Standard categories are shared and read-only; custom ones belong to one user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::exercises::{row_to_exercise, EXERCISE_COLUMNS};
use super::parse_optional_uuid;
use crate::errors::{AppError, AppResult, ErrorCode};
use planner_core::models::{Category, CategoryRequest, CategoryWithExercises, Exercise};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Category database operations manager
pub struct CategoriesManager {
    pool: SqlitePool,
}

impl CategoriesManager {
    /// Create a new categories manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a custom category owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns a validation error or a database error
    pub async fn create(&self, user_id: Uuid, request: &CategoryRequest) -> AppResult<Category> {
        request.validate()?;

        let category_id = sqlx::query("INSERT INTO categories (user_id, name) VALUES ($1, $2)")
            .bind(user_id.to_string())
            .bind(request.name.trim())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create category: {e}")))?
            .last_insert_rowid();

        info!(category_id, user_id = %user_id, "Created category");
        Ok(Category {
            id: category_id,
            user_id: Some(user_id),
            name: request.name.trim().to_owned(),
        })
    }

    /// Get a category visible to `user_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if it does not exist and `PermissionDenied`
    /// if it is another user's custom category
    pub async fn get(&self, category_id: i64, user_id: Uuid) -> AppResult<Category> {
        let category = self.fetch(category_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Category {category_id}"))
                .with_resource_id(category_id.to_string())
        })?;

        if category.is_visible_to(user_id) {
            Ok(category)
        } else {
            Err(AppError::forbidden(format!("Category {category_id}")).with_user_id(user_id))
        }
    }

    /// List standard categories plus the caller's own, by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Category>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name FROM categories
            WHERE user_id IS NULL OR user_id = $1
            ORDER BY name, id
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list categories: {e}")))?;

        rows.iter().map(row_to_category).collect()
    }

    /// List visible categories with their visible exercises nested
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails
    pub async fn list_with_exercises(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<CategoryWithExercises>> {
        let categories = self.list(user_id).await?;

        let query = format!(
            r"
            SELECT {EXERCISE_COLUMNS} FROM exercises
            WHERE user_id IS NULL OR user_id = $1
            ORDER BY name, id
            "
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        let mut by_category: HashMap<i64, Vec<Exercise>> = HashMap::new();
        for row in &rows {
            let exercise = row_to_exercise(row)?;
            by_category
                .entry(exercise.category_id)
                .or_default()
                .push(exercise);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithExercises {
                exercises: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    /// Rename a custom category
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound`, or `PermissionDenied`
    /// for standard categories and other users' categories
    pub async fn update(
        &self,
        category_id: i64,
        user_id: Uuid,
        request: &CategoryRequest,
    ) -> AppResult<Category> {
        request.validate()?;
        self.get_editable(category_id, user_id).await?;

        let result = sqlx::query("UPDATE categories SET name = $1 WHERE id = $2 AND user_id = $3")
            .bind(request.name.trim())
            .bind(category_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update category: {e}")))?;

        if result.rows_affected() == 0 {
            // Deleted between the check and the write
            return Err(AppError::not_found(format!("Category {category_id}")));
        }
        self.get(category_id, user_id).await
    }

    /// Delete a custom category and its exercises
    ///
    /// Activities filed under it keep their duration and lose the reference.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn delete(&self, category_id: i64, user_id: Uuid) -> AppResult<()> {
        self.get_editable(category_id, user_id).await?;

        sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete category: {e}")))?;

        info!(category_id, user_id = %user_id, "Deleted category");
        Ok(())
    }

    async fn fetch(&self, category_id: i64) -> AppResult<Option<Category>> {
        let row = sqlx::query("SELECT id, user_id, name FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get category: {e}")))?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn get_editable(&self, category_id: i64, user_id: Uuid) -> AppResult<Category> {
        let category = self.get(category_id, user_id).await?;
        if category.is_standard() {
            return Err(AppError::new(
                ErrorCode::PermissionDenied,
                format!("Standard category '{}' is read-only", category.name),
            )
            .with_user_id(user_id));
        }
        Ok(category)
    }
}

fn row_to_category(row: &SqliteRow) -> AppResult<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        user_id: parse_optional_uuid(row.try_get("user_id")?)?,
        name: row.try_get("name")?,
    })
}
