// ABOUTME: Database operations for training sessions inside a week
// ABOUTME: Keeps session dates inside their week and rest days free of activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::weeks::WeeksManager;
use super::{
    authorize, owned_row, parse_timestamp, parse_uuid, resolve_update_failure, OwnedTable,
};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use planner_core::models::{Period, SessionRequest, TrainingSession, Week};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

pub(super) const SESSION_COLUMNS: &str =
    "id, week_id, user_id, date, period, is_rest_day, notes, created_at";

/// Training session database operations manager
pub struct SessionsManager {
    pool: SqlitePool,
}

impl SessionsManager {
    /// Create a new sessions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Schedule a session in a week
    ///
    /// # Errors
    ///
    /// Returns a validation error (including a date outside the week) or
    /// 404/403 for the parent week
    pub async fn create(
        &self,
        week_id: i64,
        user_id: Uuid,
        request: &SessionRequest,
    ) -> AppResult<TrainingSession> {
        request.validate()?;
        let week = WeeksManager::new(self.pool.clone())
            .get(week_id, user_id)
            .await?;
        check_date_in_week(&week, request)?;

        let session_id = sqlx::query(
            r"
            INSERT INTO sessions (week_id, user_id, date, period, is_rest_day, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(week_id)
        .bind(user_id.to_string())
        .bind(request.date)
        .bind(request.period.as_ref().map(Period::as_str))
        .bind(request.is_rest_day)
        .bind(&request.notes)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create session: {e}")))?
        .last_insert_rowid();

        info!(session_id, week_id, date = %request.date, "Created session");
        self.get(session_id, user_id).await
    }

    /// Get a session owned by `user_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn get(&self, session_id: i64, user_id: Uuid) -> AppResult<TrainingSession> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get session: {e}")))?;

        let session = row.as_ref().map(row_to_session).transpose()?;
        owned_row(OwnedTable::Sessions.label(), session_id, session, user_id)
    }

    /// List the sessions of a week by date
    ///
    /// # Errors
    ///
    /// Returns 404/403 for the week, or a database error
    pub async fn list_for_week(
        &self,
        week_id: i64,
        user_id: Uuid,
    ) -> AppResult<Vec<TrainingSession>> {
        authorize(&self.pool, OwnedTable::Weeks, week_id, user_id).await?;

        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE week_id = $1 ORDER BY date, id"
        );
        let rows = sqlx::query(&query)
            .bind(week_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list sessions: {e}")))?;

        rows.iter().map(row_to_session).collect()
    }

    /// Replace a session's fields
    ///
    /// # Errors
    ///
    /// Returns a validation error (a date outside the week, or a rest day on a
    /// session that still has activities), 404/403, or a database error
    pub async fn update(
        &self,
        session_id: i64,
        user_id: Uuid,
        request: &SessionRequest,
    ) -> AppResult<TrainingSession> {
        request.validate()?;
        let existing = self.get(session_id, user_id).await?;
        let week = WeeksManager::new(self.pool.clone())
            .get(existing.week_id, user_id)
            .await?;
        check_date_in_week(&week, request)?;

        if request.is_rest_day && self.activity_count(session_id).await? > 0 {
            return Err(AppError::invalid_input(
                "A session with activities cannot become a rest day",
            )
            .with_details(serde_json::json!({ "field": "is_rest_day" })));
        }

        let result = sqlx::query(
            r"
            UPDATE sessions SET date = $1, period = $2, is_rest_day = $3, notes = $4
            WHERE id = $5 AND user_id = $6
            ",
        )
        .bind(request.date)
        .bind(request.period.as_ref().map(Period::as_str))
        .bind(request.is_rest_day)
        .bind(&request.notes)
        .bind(session_id)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => self.get(session_id, user_id).await,
            Ok(_) => Err(
                resolve_update_failure(&self.pool, OwnedTable::Sessions, session_id, None).await,
            ),
            Err(e) => Err(resolve_update_failure(
                &self.pool,
                OwnedTable::Sessions,
                session_id,
                Some(AppError::from(e)),
            )
            .await),
        }
    }

    /// Delete a session, its activities, and its combined groups
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`, or a database error
    pub async fn delete(&self, session_id: i64, user_id: Uuid) -> AppResult<()> {
        self.get(session_id, user_id).await?;

        sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete session: {e}")))?;

        info!(session_id, user_id = %user_id, "Deleted session");
        Ok(())
    }

    async fn activity_count(&self, session_id: i64) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM activities WHERE session_id = $1")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count activities: {e}")))?;
        Ok(row.try_get("count")?)
    }
}

fn check_date_in_week(week: &Week, request: &SessionRequest) -> AppResult<()> {
    if week.contains(request.date) {
        return Ok(());
    }
    Err(AppError::invalid_input(format!(
        "Session date {} is outside week {} ({} to {})",
        request.date, week.week_number, week.start_date, week.end_date
    ))
    .with_details(serde_json::json!({ "field": "date" })))
}

pub(super) fn row_to_session(row: &SqliteRow) -> AppResult<TrainingSession> {
    let period: Option<String> = row.try_get("period")?;
    Ok(TrainingSession {
        id: row.try_get("id")?,
        week_id: row.try_get("week_id")?,
        user_id: parse_uuid(&row.try_get::<String, _>("user_id")?)?,
        date: row.try_get("date")?,
        period: period.as_deref().and_then(Period::parse),
        is_rest_day: row.try_get("is_rest_day")?,
        notes: row.try_get("notes")?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}
