// ABOUTME: Database operations for combined groups of simultaneous activities
// ABOUTME: Groups hold two or more activities of one session and dissolve when they shrink below two
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::{authorize, owned_row, parse_optional_uuid, parse_uuid, OwnedTable};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use planner_core::constants::limits::MIN_COMBINED_GROUP_SIZE;
use planner_core::models::{CombinedGroup, CombinedGroupRequest};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

/// Combined group database operations manager
pub struct CombinedGroupsManager {
    pool: SqlitePool,
}

impl CombinedGroupsManager {
    /// Create a new combined groups manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Combine activities of one session into a new group
    ///
    /// Activities already in another group move to the new one; a group left
    /// with fewer than two members is dissolved.
    ///
    /// # Errors
    ///
    /// Returns a validation error for fewer than two activities or an activity
    /// from another session, and 404/403 for the session or any activity
    pub async fn create(
        &self,
        session_id: i64,
        user_id: Uuid,
        request: &CombinedGroupRequest,
    ) -> AppResult<CombinedGroup> {
        request.validate()?;
        authorize(&self.pool, OwnedTable::Sessions, session_id, user_id).await?;
        let member_ids = request.distinct_ids();
        check_members(&self.pool, session_id, user_id, &member_ids).await?;

        let group_id = Uuid::new_v4();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        insert_group(&mut tx, group_id, session_id, user_id).await?;
        assign_members(&mut tx, group_id, &member_ids).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit group: {e}")))?;

        info!(%group_id, session_id, members = member_ids.len(), "Created combined group");
        self.get(group_id, user_id).await
    }

    /// Get a combined group with its member ids
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn get(&self, group_id: Uuid, user_id: Uuid) -> AppResult<CombinedGroup> {
        let row = sqlx::query("SELECT id, session_id, user_id FROM combined_groups WHERE id = $1")
            .bind(group_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get combined group: {e}")))?;

        let group = match row {
            Some(row) => Some(CombinedGroup {
                id: parse_uuid(&row.try_get::<String, _>("id")?)?,
                session_id: row.try_get("session_id")?,
                user_id: parse_uuid(&row.try_get::<String, _>("user_id")?)?,
                member_ids: self.member_ids(group_id).await?,
            }),
            None => None,
        };
        owned_row("Combined group", group_id, group, user_id)
    }

    /// List the combined groups of a session
    ///
    /// # Errors
    ///
    /// Returns 404/403 for the session, or a database error
    pub async fn list_for_session(
        &self,
        session_id: i64,
        user_id: Uuid,
    ) -> AppResult<Vec<CombinedGroup>> {
        authorize(&self.pool, OwnedTable::Sessions, session_id, user_id).await?;

        let rows = sqlx::query(
            r"
            SELECT id FROM combined_groups WHERE session_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list combined groups: {e}")))?;

        let mut groups = Vec::with_capacity(rows.len());
        for row in &rows {
            let group_id = parse_uuid(&row.try_get::<String, _>("id")?)?;
            groups.push(self.get(group_id, user_id).await?);
        }
        Ok(groups)
    }

    /// Replace the members of a group
    ///
    /// # Errors
    ///
    /// Returns a validation error, 404/403 for the group or any activity, or
    /// `ResourceNotFound` when the group is deleted during the update
    pub async fn update(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        request: &CombinedGroupRequest,
    ) -> AppResult<CombinedGroup> {
        request.validate()?;
        let existing = self.get(group_id, user_id).await?;
        let member_ids = request.distinct_ids();
        check_members(&self.pool, existing.session_id, user_id, &member_ids).await?;

        let outcome = self.replace_members(group_id, &member_ids).await;
        if let Err(error) = outcome {
            return Err(match self.exists(group_id).await {
                Ok(false) => AppError::not_found(format!("Combined group {group_id}")),
                _ => error,
            });
        }

        info!(%group_id, members = member_ids.len(), "Updated combined group");
        self.get(group_id, user_id).await
    }

    /// Delete a group; its former members become standalone activities
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied`
    pub async fn delete(&self, group_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.get(group_id, user_id).await?;

        sqlx::query("DELETE FROM combined_groups WHERE id = $1")
            .bind(group_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete combined group: {e}")))?;

        info!(%group_id, user_id = %user_id, "Deleted combined group");
        Ok(())
    }

    async fn replace_members(&self, group_id: Uuid, member_ids: &[i64]) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("UPDATE activities SET combined_group_id = NULL WHERE combined_group_id = $1")
            .bind(group_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear group members: {e}")))?;
        assign_members(&mut tx, group_id, member_ids).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit group: {e}")))
    }

    async fn member_ids(&self, group_id: Uuid) -> AppResult<Vec<i64>> {
        let rows =
            sqlx::query("SELECT id FROM activities WHERE combined_group_id = $1 ORDER BY id")
                .bind(group_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to list group members: {e}")))?;

        rows.iter()
            .map(|row| row.try_get("id").map_err(AppError::from))
            .collect()
    }

    async fn exists(&self, group_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM combined_groups WHERE id = $1")
            .bind(group_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

/// Check that every activity exists, belongs to `user_id`, and sits in `session_id`
///
/// Returns each activity's current group.
pub(super) async fn check_members(
    pool: &SqlitePool,
    session_id: i64,
    user_id: Uuid,
    activity_ids: &[i64],
) -> AppResult<Vec<Option<Uuid>>> {
    let mut groups = Vec::with_capacity(activity_ids.len());
    for &activity_id in activity_ids {
        let row = sqlx::query(
            "SELECT session_id, user_id, combined_group_id FROM activities WHERE id = $1",
        )
        .bind(activity_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get activity: {e}")))?;

        let Some(row) = row else {
            return Err(AppError::not_found(format!("Activity {activity_id}"))
                .with_resource_id(activity_id.to_string()));
        };
        let owner = parse_uuid(&row.try_get::<String, _>("user_id")?)?;
        if owner != user_id {
            return Err(AppError::forbidden(format!("Activity {activity_id}")).with_user_id(user_id));
        }
        let member_session: i64 = row.try_get("session_id")?;
        if member_session != session_id {
            return Err(AppError::invalid_input(format!(
                "Activity {activity_id} belongs to session {member_session}, not {session_id}"
            ))
            .with_details(serde_json::json!({ "field": "activity_ids" })));
        }
        groups.push(parse_optional_uuid(row.try_get("combined_group_id")?)?);
    }
    Ok(groups)
}

/// Insert the group row
pub(super) async fn insert_group(
    conn: &mut SqliteConnection,
    group_id: Uuid,
    session_id: i64,
    user_id: Uuid,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO combined_groups (id, session_id, user_id, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(group_id.to_string())
    .bind(session_id)
    .bind(user_id.to_string())
    .bind(Utc::now().to_rfc3339())
    .execute(conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to create combined group: {e}")))?;
    Ok(())
}

/// Point activities at `group_id`, dissolving any group they leave behind
pub(super) async fn assign_members(
    conn: &mut SqliteConnection,
    group_id: Uuid,
    activity_ids: &[i64],
) -> AppResult<()> {
    let mut left_behind = BTreeSet::new();
    for &activity_id in activity_ids {
        let previous: Option<String> =
            sqlx::query("SELECT combined_group_id FROM activities WHERE id = $1")
                .bind(activity_id)
                .fetch_one(&mut *conn)
                .await?
                .try_get("combined_group_id")?;
        if let Some(previous) = parse_optional_uuid(previous)? {
            if previous != group_id {
                left_behind.insert(previous);
            }
        }

        sqlx::query("UPDATE activities SET combined_group_id = $1 WHERE id = $2")
            .bind(group_id.to_string())
            .bind(activity_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to assign group member: {e}")))?;
    }

    for previous in left_behind {
        dissolve_if_undersized(conn, previous).await?;
    }
    Ok(())
}

/// Delete `group_id` once fewer than two activities remain in it
///
/// Returns whether the group was dissolved.
pub(super) async fn dissolve_if_undersized(
    conn: &mut SqliteConnection,
    group_id: Uuid,
) -> AppResult<bool> {
    let remaining: i64 =
        sqlx::query("SELECT COUNT(*) AS count FROM activities WHERE combined_group_id = $1")
            .bind(group_id.to_string())
            .fetch_one(&mut *conn)
            .await?
            .try_get("count")?;

    if usize::try_from(remaining).unwrap_or(0) >= MIN_COMBINED_GROUP_SIZE {
        return Ok(false);
    }

    sqlx::query("DELETE FROM combined_groups WHERE id = $1")
        .bind(group_id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to dissolve combined group: {e}")))?;
    debug!(%group_id, remaining, "Dissolved undersized combined group");
    Ok(true)
}
