// ABOUTME: Database operations for plan weeks
// ABOUTME: Week numbers are unique within a plan, weeks never overlap, and a move keeps sessions inside
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::{authorize, owned_row, parse_uuid, resolve_update_failure, to_u32, OwnedTable};
use crate::errors::{AppError, AppResult};
use planner_core::models::{Week, WeekRequest};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

const WEEK_COLUMNS: &str = "id, plan_id, user_id, week_number, start_date, end_date";

/// Week database operations manager
pub struct WeeksManager {
    pool: SqlitePool,
}

impl WeeksManager {
    /// Create a new weeks manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a week to a plan
    ///
    /// # Errors
    ///
    /// Returns a validation error, 404/403 for the parent plan,
    /// `ResourceAlreadyExists` when the week number is taken, or
    /// `ResourceConflict` when the dates overlap another week of the plan
    pub async fn create(
        &self,
        plan_id: i64,
        user_id: Uuid,
        request: &WeekRequest,
    ) -> AppResult<Week> {
        request.validate()?;
        authorize(&self.pool, OwnedTable::Plans, plan_id, user_id).await?;
        self.check_overlap(plan_id, None, request).await?;

        let week_id = sqlx::query(
            r"
            INSERT INTO weeks (plan_id, user_id, week_number, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(plan_id)
        .bind(user_id.to_string())
        .bind(i64::from(request.week_number))
        .bind(request.start_date)
        .bind(request.end_date)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(week_id, plan_id, week_number = request.week_number, "Created week");
        self.get(week_id, user_id).await
    }

    /// Get a week owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn get(&self, week_id: i64, user_id: Uuid) -> AppResult<Week> {
        let query = format!("SELECT {WEEK_COLUMNS} FROM weeks WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(week_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get week: {e}")))?;

        let week = row.as_ref().map(row_to_week).transpose()?;
        owned_row(OwnedTable::Weeks.label(), week_id, week, user_id)
    }

    /// List the weeks of a plan in week-number order
    ///
    /// # Errors
    ///
    /// Returns 404/403 for the plan, or a database error
    pub async fn list_for_plan(&self, plan_id: i64, user_id: Uuid) -> AppResult<Vec<Week>> {
        authorize(&self.pool, OwnedTable::Plans, plan_id, user_id).await?;

        let query =
            format!("SELECT {WEEK_COLUMNS} FROM weeks WHERE plan_id = $1 ORDER BY week_number");
        let rows = sqlx::query(&query)
            .bind(plan_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list weeks: {e}")))?;

        rows.iter().map(row_to_week).collect()
    }

    /// Change a week's number or dates
    ///
    /// # Errors
    ///
    /// Returns a validation error, 404/403, `ResourceAlreadyExists` when the
    /// new week number is taken, `ResourceConflict` when the dates overlap
    /// another week, or `InvalidInput` when existing sessions would fall
    /// outside the new range
    pub async fn update(
        &self,
        week_id: i64,
        user_id: Uuid,
        request: &WeekRequest,
    ) -> AppResult<Week> {
        request.validate()?;
        let existing = self.get(week_id, user_id).await?;
        if (existing.start_date, existing.end_date) != (request.start_date, request.end_date) {
            self.check_overlap(existing.plan_id, Some(week_id), request)
                .await?;
            self.check_sessions_fit(&existing, request).await?;
        }

        let result = sqlx::query(
            r"
            UPDATE weeks SET week_number = $1, start_date = $2, end_date = $3
            WHERE id = $4 AND user_id = $5
            ",
        )
        .bind(i64::from(request.week_number))
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(week_id)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => self.get(week_id, user_id).await,
            Ok(_) => Err(resolve_update_failure(&self.pool, OwnedTable::Weeks, week_id, None).await),
            Err(e) => Err(resolve_update_failure(
                &self.pool,
                OwnedTable::Weeks,
                week_id,
                Some(AppError::from(e)),
            )
            .await),
        }
    }

    /// Delete a week and its sessions
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`, or a database error
    pub async fn delete(&self, week_id: i64, user_id: Uuid) -> AppResult<()> {
        self.get(week_id, user_id).await?;

        sqlx::query("DELETE FROM weeks WHERE id = $1 AND user_id = $2")
            .bind(week_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete week: {e}")))?;

        info!(week_id, user_id = %user_id, "Deleted week");
        Ok(())
    }

    /// Reject a date range that shares a day with another week of the plan
    async fn check_overlap(
        &self,
        plan_id: i64,
        exclude_week: Option<i64>,
        request: &WeekRequest,
    ) -> AppResult<()> {
        let query = format!(
            "SELECT {WEEK_COLUMNS} FROM weeks WHERE plan_id = $1 AND start_date <= $2 AND end_date >= $3"
        );
        let rows = sqlx::query(&query)
            .bind(plan_id)
            .bind(request.end_date)
            .bind(request.start_date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check week dates: {e}")))?;

        for row in &rows {
            let other = row_to_week(row)?;
            if Some(other.id) != exclude_week && request.overlaps(&other) {
                return Err(AppError::conflict(format!(
                    "Week {} to {} overlaps week {} ({} to {})",
                    request.start_date,
                    request.end_date,
                    other.week_number,
                    other.start_date,
                    other.end_date
                ))
                .with_details(serde_json::json!({
                    "field": "start_date",
                    "week_id": other.id,
                })));
            }
        }
        Ok(())
    }

    /// Reject a move that would leave existing sessions outside the week
    async fn check_sessions_fit(&self, week: &Week, request: &WeekRequest) -> AppResult<()> {
        let outside: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sessions WHERE week_id = $1 AND (date < $2 OR date > $3)",
        )
        .bind(week.id)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check week sessions: {e}")))?;

        if outside > 0 {
            return Err(AppError::invalid_input(format!(
                "Week {} has {outside} session(s) outside {} to {}; move or delete them first",
                week.week_number, request.start_date, request.end_date
            ))
            .with_details(serde_json::json!({ "field": "start_date" })));
        }
        Ok(())
    }
}

pub(super) fn row_to_week(row: &SqliteRow) -> AppResult<Week> {
    Ok(Week {
        id: row.try_get("id")?,
        plan_id: row.try_get("plan_id")?,
        user_id: parse_uuid(&row.try_get::<String, _>("user_id")?)?,
        week_number: to_u32("week_number", row.try_get("week_number")?)?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
    })
}
