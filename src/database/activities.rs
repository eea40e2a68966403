// ABOUTME: Database operations for activities inside a training session
// ABOUTME: Checks category, exercise, and variation choices and keeps combined groups consistent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::categories::CategoriesManager;
use super::combined_groups::{assign_members, check_members, dissolve_if_undersized, insert_group};
use super::exercises::ExercisesManager;
use super::sessions::SessionsManager;
use super::{
    owned_row, parse_optional_uuid, parse_uuid, resolve_update_failure, to_u32, OwnedTable,
};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use planner_core::models::{
    Activity, ActivityDetails, ActivityFormat, CreateActivityRequest, UpdateActivityRequest,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

/// Activity columns joined with category and exercise names
pub(super) const ACTIVITY_DETAILS_SELECT: &str = r"
    SELECT a.id AS id, a.session_id AS session_id, a.user_id AS user_id,
           a.duration_minutes AS duration_minutes, a.format AS format,
           a.category_id AS category_id, a.exercise_id AS exercise_id,
           a.variation AS variation, a.combined_group_id AS combined_group_id,
           c.name AS category_name, e.name AS exercise_name
    FROM activities a
    LEFT JOIN categories c ON c.id = a.category_id
    LEFT JOIN exercises e ON e.id = a.exercise_id
";

/// Activity database operations manager
pub struct ActivitiesManager {
    pool: SqlitePool,
}

impl ActivitiesManager {
    /// Create a new activities manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an activity to a session, optionally combining it with existing ones
    ///
    /// When `combine_with` names activities already in a group, the new
    /// activity joins that group; otherwise a new group is formed.
    ///
    /// # Errors
    ///
    /// Returns a validation error (rest day, exercise outside the category,
    /// bad variation, partners in different groups), or 404/403 for the
    /// session, category, exercise, or any partner
    pub async fn create(
        &self,
        session_id: i64,
        user_id: Uuid,
        request: &CreateActivityRequest,
    ) -> AppResult<ActivityDetails> {
        request.validate()?;
        let session = SessionsManager::new(self.pool.clone())
            .get(session_id, user_id)
            .await?;
        if session.is_rest_day {
            return Err(AppError::invalid_input(format!(
                "Session {session_id} is a rest day and cannot hold activities"
            )));
        }
        self.check_catalog(
            user_id,
            request.category_id,
            request.exercise_id,
            request.variation.as_deref(),
        )
        .await?;

        let partners: Vec<i64> = request
            .combine_with
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let partner_groups = check_members(&self.pool, session_id, user_id, &partners).await?;
        let existing_groups: BTreeSet<Uuid> = partner_groups.into_iter().flatten().collect();
        if existing_groups.len() > 1 {
            return Err(AppError::invalid_input(
                "Activities in combine_with belong to different combined groups",
            )
            .with_details(serde_json::json!({ "field": "combine_with" })));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let activity_id = sqlx::query(
            r"
            INSERT INTO activities (session_id, user_id, duration_minutes, format, category_id,
                                    exercise_id, variation, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(session_id)
        .bind(user_id.to_string())
        .bind(i64::from(request.duration_minutes))
        .bind(request.format.as_str())
        .bind(request.category_id)
        .bind(request.exercise_id)
        .bind(&request.variation)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create activity: {e}")))?
        .last_insert_rowid();

        if !partners.is_empty() {
            let group_id = match existing_groups.into_iter().next() {
                Some(group_id) => group_id,
                None => {
                    let group_id = Uuid::new_v4();
                    insert_group(&mut tx, group_id, session_id, user_id).await?;
                    group_id
                }
            };
            let mut members = partners;
            members.push(activity_id);
            assign_members(&mut tx, group_id, &members).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit activity: {e}")))?;

        info!(
            activity_id,
            session_id,
            duration_minutes = request.duration_minutes,
            "Created activity"
        );
        self.get(activity_id, user_id).await
    }

    /// Get an activity with its category and exercise names
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn get(&self, activity_id: i64, user_id: Uuid) -> AppResult<ActivityDetails> {
        let query = format!("{ACTIVITY_DETAILS_SELECT} WHERE a.id = $1");
        let row = sqlx::query(&query)
            .bind(activity_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get activity: {e}")))?;

        let activity = row.as_ref().map(row_to_activity_details).transpose()?;
        owned_row(OwnedTable::Activities.label(), activity_id, activity, user_id)
    }

    /// List the activities of a session in insertion order
    ///
    /// # Errors
    ///
    /// Returns 404/403 for the session, or a database error
    pub async fn list_for_session(
        &self,
        session_id: i64,
        user_id: Uuid,
    ) -> AppResult<Vec<ActivityDetails>> {
        SessionsManager::new(self.pool.clone())
            .get(session_id, user_id)
            .await?;

        let query = format!("{ACTIVITY_DETAILS_SELECT} WHERE a.session_id = $1 ORDER BY a.id");
        let rows = sqlx::query(&query)
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list activities: {e}")))?;

        rows.iter().map(row_to_activity_details).collect()
    }

    /// Replace an activity's fields; group membership is unchanged
    ///
    /// # Errors
    ///
    /// Returns a validation error, 404/403, or `ResourceNotFound` when the
    /// activity is deleted during the update
    pub async fn update(
        &self,
        activity_id: i64,
        user_id: Uuid,
        request: &UpdateActivityRequest,
    ) -> AppResult<ActivityDetails> {
        request.validate()?;
        self.get(activity_id, user_id).await?;
        self.check_catalog(
            user_id,
            request.category_id,
            request.exercise_id,
            request.variation.as_deref(),
        )
        .await?;

        let result = sqlx::query(
            r"
            UPDATE activities
            SET duration_minutes = $1, format = $2, category_id = $3, exercise_id = $4, variation = $5
            WHERE id = $6 AND user_id = $7
            ",
        )
        .bind(i64::from(request.duration_minutes))
        .bind(request.format.as_str())
        .bind(request.category_id)
        .bind(request.exercise_id)
        .bind(&request.variation)
        .bind(activity_id)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => self.get(activity_id, user_id).await,
            Ok(_) => Err(resolve_update_failure(
                &self.pool,
                OwnedTable::Activities,
                activity_id,
                None,
            )
            .await),
            Err(e) => Err(resolve_update_failure(
                &self.pool,
                OwnedTable::Activities,
                activity_id,
                Some(AppError::from(e)),
            )
            .await),
        }
    }

    /// Delete an activity, dissolving its group if one member would remain
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`, or a database error
    pub async fn delete(&self, activity_id: i64, user_id: Uuid) -> AppResult<()> {
        let existing = self.get(activity_id, user_id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("DELETE FROM activities WHERE id = $1 AND user_id = $2")
            .bind(activity_id)
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete activity: {e}")))?;

        if let Some(group_id) = existing.activity.combined_group_id {
            dissolve_if_undersized(&mut tx, group_id).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit delete: {e}")))?;

        info!(activity_id, user_id = %user_id, "Deleted activity");
        Ok(())
    }

    /// Check that the category and exercise are visible and match, and that
    /// the variation is one the exercise offers
    async fn check_catalog(
        &self,
        user_id: Uuid,
        category_id: i64,
        exercise_id: i64,
        variation: Option<&str>,
    ) -> AppResult<()> {
        let category = CategoriesManager::new(self.pool.clone())
            .get(category_id, user_id)
            .await?;
        let exercise = ExercisesManager::new(self.pool.clone())
            .get(exercise_id, user_id)
            .await?;

        if exercise.category_id != category.id {
            return Err(AppError::invalid_input(format!(
                "Exercise '{}' does not belong to category '{}'",
                exercise.name, category.name
            ))
            .with_details(serde_json::json!({ "field": "exercise_id" })));
        }
        exercise.check_variation(variation)
    }
}

pub(super) fn row_to_activity_details(row: &SqliteRow) -> AppResult<ActivityDetails> {
    let format: String = row.try_get("format")?;
    Ok(ActivityDetails {
        activity: Activity {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_id: parse_uuid(&row.try_get::<String, _>("user_id")?)?,
            duration_minutes: to_u32("duration_minutes", row.try_get("duration_minutes")?)?,
            format: ActivityFormat::parse(&format),
            category_id: row.try_get("category_id")?,
            exercise_id: row.try_get("exercise_id")?,
            variation: row.try_get("variation")?,
            combined_group_id: parse_optional_uuid(row.try_get("combined_group_id")?)?,
        },
        category_name: row.try_get("category_name")?,
        exercise_name: row.try_get("exercise_name")?,
    })
}
