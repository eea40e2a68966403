// ABOUTME: Database operations for season plans
// ABOUTME: Creates a plan and its generated weeks atomically and enforces plan ownership
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::{owned_row, parse_timestamp, parse_uuid, resolve_update_failure, to_u32, OwnedTable};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use planner_core::calendar::generate_weeks;
use planner_core::models::{CreatePlanRequest, Plan, UpdatePlanRequest, Week};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

/// Plan database operations manager
pub struct PlansManager {
    pool: SqlitePool,
}

impl PlansManager {
    /// Create a new plans manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a plan together with its Monday-aligned weeks
    ///
    /// The plan row and every week row are written in one transaction, so a
    /// failure leaves no partial plan behind.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad request, or a database error if
    /// any insert fails
    pub async fn create_with_weeks(
        &self,
        user_id: Uuid,
        request: &CreatePlanRequest,
    ) -> AppResult<(Plan, Vec<Week>)> {
        request.validate()?;

        let duration_weeks = request.effective_duration();
        let ranges = generate_weeks(request.start_date, duration_weeks).ok_or_else(|| {
            AppError::out_of_range("start_date", "Plan weeks run past the supported calendar")
        })?;
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let plan_id = sqlx::query(
            r"
            INSERT INTO plans (user_id, year, team_name, coach_name, start_date, duration_weeks, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(user_id.to_string())
        .bind(request.year())
        .bind(&request.team_name)
        .bind(&request.coach_name)
        .bind(request.start_date)
        .bind(i64::from(duration_weeks))
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create plan: {e}")))?
        .last_insert_rowid();

        let mut weeks = Vec::with_capacity(ranges.len());
        for range in ranges {
            let week_id = sqlx::query(
                r"
                INSERT INTO weeks (plan_id, user_id, week_number, start_date, end_date)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(plan_id)
            .bind(user_id.to_string())
            .bind(i64::from(range.week_number))
            .bind(range.start_date)
            .bind(range.end_date)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to create week: {e}")))?
            .last_insert_rowid();

            weeks.push(Week {
                id: week_id,
                plan_id,
                user_id,
                week_number: range.week_number,
                start_date: range.start_date,
                end_date: range.end_date,
            });
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit plan: {e}")))?;

        info!(
            plan_id,
            user_id = %user_id,
            weeks = weeks.len(),
            "Created plan"
        );

        let plan = Plan {
            id: plan_id,
            user_id,
            year: request.year(),
            team_name: request.team_name.clone(),
            coach_name: request.coach_name.clone(),
            start_date: request.start_date,
            duration_weeks,
            created_at: now,
        };
        Ok((plan, weeks))
    }

    /// Get a plan owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the plan does not exist and
    /// `PermissionDenied` if another user owns it
    pub async fn get(&self, plan_id: i64, user_id: Uuid) -> AppResult<Plan> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, year, team_name, coach_name, start_date, duration_weeks, created_at
            FROM plans WHERE id = $1
            ",
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get plan: {e}")))?;

        let plan = row.as_ref().map(row_to_plan).transpose()?;
        owned_row(OwnedTable::Plans.label(), plan_id, plan, user_id)
    }

    /// List every plan owned by `user_id`, newest season first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Plan>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, year, team_name, coach_name, start_date, duration_weeks, created_at
            FROM plans WHERE user_id = $1
            ORDER BY start_date DESC, id DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?;

        rows.iter().map(row_to_plan).collect()
    }

    /// Update a plan's year and names
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound` (also when the plan is
    /// deleted mid-update), or `PermissionDenied`
    pub async fn update(
        &self,
        plan_id: i64,
        user_id: Uuid,
        request: &UpdatePlanRequest,
    ) -> AppResult<Plan> {
        request.validate()?;
        self.get(plan_id, user_id).await?;

        let result = sqlx::query(
            r"
            UPDATE plans SET year = $1, team_name = $2, coach_name = $3
            WHERE id = $4 AND user_id = $5
            ",
        )
        .bind(request.year)
        .bind(&request.team_name)
        .bind(&request.coach_name)
        .bind(plan_id)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => self.get(plan_id, user_id).await,
            Ok(_) => Err(resolve_update_failure(&self.pool, OwnedTable::Plans, plan_id, None).await),
            Err(e) => Err(resolve_update_failure(
                &self.pool,
                OwnedTable::Plans,
                plan_id,
                Some(AppError::from(e)),
            )
            .await),
        }
    }

    /// Delete a plan and, through cascading keys, everything under it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`, or a database error
    pub async fn delete(&self, plan_id: i64, user_id: Uuid) -> AppResult<()> {
        self.get(plan_id, user_id).await?;

        sqlx::query("DELETE FROM plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete plan: {e}")))?;

        info!(plan_id, user_id = %user_id, "Deleted plan");
        Ok(())
    }
}

fn row_to_plan(row: &SqliteRow) -> AppResult<Plan> {
    Ok(Plan {
        id: row.try_get("id")?,
        user_id: parse_uuid(&row.try_get::<String, _>("user_id")?)?,
        year: row.try_get("year")?,
        team_name: row.try_get("team_name")?,
        coach_name: row.try_get("coach_name")?,
        start_date: row.try_get("start_date")?,
        duration_weeks: to_u32("duration_weeks", row.try_get("duration_weeks")?)?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}
