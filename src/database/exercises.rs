// ABOUTME: Database operations for exercises filed under categories
// ABOUTME: Stores the variation list as JSON and applies the same visibility rules as categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::categories::CategoriesManager;
use super::parse_optional_uuid;
use crate::errors::{AppError, AppResult, ErrorCode};
use planner_core::models::{Exercise, ExerciseRequest};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

pub(super) const EXERCISE_COLUMNS: &str =
    "id, category_id, user_id, name, description, variations, combinations";

/// Exercise database operations manager
pub struct ExercisesManager {
    pool: SqlitePool,
}

impl ExercisesManager {
    /// Create a new exercises manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an exercise owned by `user_id` to a visible category
    ///
    /// Custom exercises may live under standard categories.
    ///
    /// # Errors
    ///
    /// Returns a validation error or 404/403 for the category
    pub async fn create(
        &self,
        category_id: i64,
        user_id: Uuid,
        request: &ExerciseRequest,
    ) -> AppResult<Exercise> {
        request.validate()?;
        CategoriesManager::new(self.pool.clone())
            .get(category_id, user_id)
            .await?;

        let variations = serde_json::to_string(&request.variations)?;
        let exercise_id = sqlx::query(
            r"
            INSERT INTO exercises (category_id, user_id, name, description, variations, combinations)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(category_id)
        .bind(user_id.to_string())
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(&variations)
        .bind(&request.combinations)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercise: {e}")))?
        .last_insert_rowid();

        info!(exercise_id, category_id, user_id = %user_id, "Created exercise");
        self.get(exercise_id, user_id).await
    }

    /// Get an exercise visible to `user_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn get(&self, exercise_id: i64, user_id: Uuid) -> AppResult<Exercise> {
        let query = format!("SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(exercise_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        let exercise = row.as_ref().map(row_to_exercise).transpose()?.ok_or_else(|| {
            AppError::not_found(format!("Exercise {exercise_id}"))
                .with_resource_id(exercise_id.to_string())
        })?;

        if exercise.is_visible_to(user_id) {
            Ok(exercise)
        } else {
            Err(AppError::forbidden(format!("Exercise {exercise_id}")).with_user_id(user_id))
        }
    }

    /// List the visible exercises of a visible category, by name
    ///
    /// # Errors
    ///
    /// Returns 404/403 for the category, or a database error
    pub async fn list_for_category(
        &self,
        category_id: i64,
        user_id: Uuid,
    ) -> AppResult<Vec<Exercise>> {
        CategoriesManager::new(self.pool.clone())
            .get(category_id, user_id)
            .await?;

        let query = format!(
            r"
            SELECT {EXERCISE_COLUMNS} FROM exercises
            WHERE category_id = $1 AND (user_id IS NULL OR user_id = $2)
            ORDER BY name, id
            "
        );
        let rows = sqlx::query(&query)
            .bind(category_id)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }

    /// Replace a custom exercise's fields
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound`, or `PermissionDenied`
    /// for standard exercises and other users' exercises
    pub async fn update(
        &self,
        exercise_id: i64,
        user_id: Uuid,
        request: &ExerciseRequest,
    ) -> AppResult<Exercise> {
        request.validate()?;
        self.get_editable(exercise_id, user_id).await?;

        let variations = serde_json::to_string(&request.variations)?;
        let result = sqlx::query(
            r"
            UPDATE exercises SET name = $1, description = $2, variations = $3, combinations = $4
            WHERE id = $5 AND user_id = $6
            ",
        )
        .bind(request.name.trim())
        .bind(&request.description)
        .bind(&variations)
        .bind(&request.combinations)
        .bind(exercise_id)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update exercise: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Exercise {exercise_id}")));
        }
        self.get(exercise_id, user_id).await
    }

    /// Delete a custom exercise; activities that used it keep their minutes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn delete(&self, exercise_id: i64, user_id: Uuid) -> AppResult<()> {
        self.get_editable(exercise_id, user_id).await?;

        sqlx::query("DELETE FROM exercises WHERE id = $1 AND user_id = $2")
            .bind(exercise_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete exercise: {e}")))?;

        info!(exercise_id, user_id = %user_id, "Deleted exercise");
        Ok(())
    }

    async fn get_editable(&self, exercise_id: i64, user_id: Uuid) -> AppResult<Exercise> {
        let exercise = self.get(exercise_id, user_id).await?;
        if exercise.user_id.is_none() {
            return Err(AppError::new(
                ErrorCode::PermissionDenied,
                format!("Standard exercise '{}' is read-only", exercise.name),
            )
            .with_user_id(user_id));
        }
        Ok(exercise)
    }
}

pub(super) fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    let variations: String = row.try_get("variations")?;
    Ok(Exercise {
        id: row.try_get("id")?,
        category_id: row.try_get("category_id")?,
        user_id: parse_optional_uuid(row.try_get("user_id")?)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        variations: serde_json::from_str(&variations)?,
        combinations: row.try_get("combinations")?,
    })
}
