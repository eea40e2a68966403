// ABOUTME: Database operations for team roles reference data
// ABOUTME: Roles are shared by every user and have unique names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use crate::errors::{AppError, AppResult};
use planner_core::models::{Role, RoleRequest};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

/// Role database operations manager
pub struct RolesManager {
    pool: SqlitePool,
}

impl RolesManager {
    /// Create a new roles manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a role
    ///
    /// # Errors
    ///
    /// Returns a validation error or `ResourceAlreadyExists` for a duplicate name
    pub async fn create(&self, request: &RoleRequest) -> AppResult<Role> {
        request.validate()?;

        let role_id = sqlx::query("INSERT INTO roles (name) VALUES ($1)")
            .bind(request.name.trim())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        info!(role_id, name = %request.name.trim(), "Created role");
        Ok(Role {
            id: role_id,
            name: request.name.trim().to_owned(),
        })
    }

    /// Get a role by id
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the role does not exist
    pub async fn get(&self, role_id: i64) -> AppResult<Role> {
        let row = sqlx::query("SELECT id, name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get role: {e}")))?;

        row.as_ref().map(row_to_role).transpose()?.ok_or_else(|| {
            AppError::not_found(format!("Role {role_id}")).with_resource_id(role_id.to_string())
        })
    }

    /// List every role by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list roles: {e}")))?;

        rows.iter().map(row_to_role).collect()
    }

    /// Rename a role
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ResourceNotFound`, or
    /// `ResourceAlreadyExists` when the name is taken
    pub async fn update(&self, role_id: i64, request: &RoleRequest) -> AppResult<Role> {
        request.validate()?;

        let result = sqlx::query("UPDATE roles SET name = $1 WHERE id = $2")
            .bind(request.name.trim())
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Role {role_id}")));
        }
        self.get(role_id).await
    }

    /// Delete a role
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the role does not exist
    pub async fn delete(&self, role_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete role: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Role {role_id}")));
        }
        info!(role_id, "Deleted role");
        Ok(())
    }
}

fn row_to_role(row: &SqliteRow) -> AppResult<Role> {
    Ok(Role {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}
