// ABOUTME: SQLite connection pool, schema migrations, and per-entity managers
// ABOUTME: Enforces foreign keys so deleting a plan cascades down to its activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! # Database Management
//!
//! One `Database` owns the connection pool. Each table family has a manager
//! (`PlansManager`, `SessionsManager`, ...) created on demand from the pool;
//! managers enforce ownership before touching a row, so route handlers only
//! translate HTTP into manager calls.

mod activities;
mod categories;
mod combined_groups;
mod exercises;
mod hierarchy;
mod plans;
mod roles;
mod sessions;
mod weeks;

pub use activities::ActivitiesManager;
pub use categories::CategoriesManager;
pub use combined_groups::CombinedGroupsManager;
pub use exercises::ExercisesManager;
pub use hierarchy::HierarchyLoader;
pub use plans::PlansManager;
pub use roles::RolesManager;
pub use sessions::SessionsManager;
pub use weeks::WeeksManager;

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use planner_core::constants::reference::STANDARD_CATEGORIES;
use planner_core::models::{ActivityDetails, CombinedGroup, Plan, TrainingSession, Week};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Connection pool size for file-backed databases
const FILE_POOL_SIZE: u32 = 5;

/// Database handle shared by every request
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and apply migrations
    ///
    /// In-memory databases live inside a single connection, so the pool is
    /// pinned to one connection that is never recycled.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or a
    /// migration fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;
        Ok(database)
    }

    /// Get a reference to the connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table and seed the standard categories
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        self.seed_standard_categories().await?;
        info!("Database migrations complete");
        Ok(())
    }

    async fn seed_standard_categories(&self) -> AppResult<()> {
        for name in STANDARD_CATEGORIES {
            let inserted = sqlx::query(
                r"
                INSERT INTO categories (user_id, name)
                SELECT NULL, $1
                WHERE NOT EXISTS (
                    SELECT 1 FROM categories WHERE user_id IS NULL AND name = $1
                )
                ",
            )
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to seed categories: {e}")))?;

            if inserted.rows_affected() > 0 {
                debug!(category = name, "Seeded standard category");
            }
        }
        Ok(())
    }

    /// Confirm the database answers queries
    ///
    /// # Errors
    ///
    /// Returns an error if the probe query fails
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database health check failed: {e}")))?;
        Ok(())
    }

    /// Plan operations
    #[must_use]
    pub fn plans(&self) -> PlansManager {
        PlansManager::new(self.pool.clone())
    }

    /// Week operations
    #[must_use]
    pub fn weeks(&self) -> WeeksManager {
        WeeksManager::new(self.pool.clone())
    }

    /// Session operations
    #[must_use]
    pub fn sessions(&self) -> SessionsManager {
        SessionsManager::new(self.pool.clone())
    }

    /// Activity operations
    #[must_use]
    pub fn activities(&self) -> ActivitiesManager {
        ActivitiesManager::new(self.pool.clone())
    }

    /// Combined group operations
    #[must_use]
    pub fn combined_groups(&self) -> CombinedGroupsManager {
        CombinedGroupsManager::new(self.pool.clone())
    }

    /// Category operations
    #[must_use]
    pub fn categories(&self) -> CategoriesManager {
        CategoriesManager::new(self.pool.clone())
    }

    /// Exercise operations
    #[must_use]
    pub fn exercises(&self) -> ExercisesManager {
        ExercisesManager::new(self.pool.clone())
    }

    /// Role operations
    #[must_use]
    pub fn roles(&self) -> RolesManager {
        RolesManager::new(self.pool.clone())
    }

    /// Nested plan, week, and session views with real-duration totals
    #[must_use]
    pub fn hierarchy(&self) -> HierarchyLoader {
        HierarchyLoader::new(self.pool.clone())
    }
}

/// Schema statements, applied in order
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS plans (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        year INTEGER NOT NULL CHECK (year BETWEEN 2020 AND 2099),
        team_name TEXT NOT NULL,
        coach_name TEXT NOT NULL,
        start_date TEXT NOT NULL,
        duration_weeks INTEGER NOT NULL CHECK (duration_weeks BETWEEN 1 AND 53),
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_plans_user_id ON plans(user_id)",
    r"
    CREATE TABLE IF NOT EXISTS weeks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plan_id INTEGER NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        week_number INTEGER NOT NULL CHECK (week_number BETWEEN 1 AND 53),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        UNIQUE (plan_id, week_number)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        week_id INTEGER NOT NULL REFERENCES weeks(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        date TEXT NOT NULL,
        period TEXT,
        is_rest_day INTEGER NOT NULL DEFAULT 0,
        notes TEXT,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_sessions_week_id ON sessions(week_id)",
    r"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT,
        name TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS exercises (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        user_id TEXT,
        name TEXT NOT NULL,
        description TEXT,
        variations TEXT NOT NULL DEFAULT '[]',
        combinations TEXT
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS combined_groups (
        id TEXT PRIMARY KEY,
        session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL CHECK (duration_minutes BETWEEN 1 AND 600),
        format TEXT NOT NULL,
        category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
        exercise_id INTEGER REFERENCES exercises(id) ON DELETE SET NULL,
        variation TEXT,
        combined_group_id TEXT REFERENCES combined_groups(id) ON DELETE SET NULL,
        created_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_activities_session_id ON activities(session_id)",
    r"
    CREATE TABLE IF NOT EXISTS roles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    ",
];

/// Tables whose rows carry an owner and are addressed by integer id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OwnedTable {
    Plans,
    Weeks,
    Sessions,
    Activities,
}

impl OwnedTable {
    const fn table(self) -> &'static str {
        match self {
            Self::Plans => "plans",
            Self::Weeks => "weeks",
            Self::Sessions => "sessions",
            Self::Activities => "activities",
        }
    }

    /// Human-readable resource name used in error messages
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Plans => "Plan",
            Self::Weeks => "Week",
            Self::Sessions => "Session",
            Self::Activities => "Activity",
        }
    }
}

/// Rows that belong to a single user
pub(crate) trait Owned {
    fn owner(&self) -> Uuid;
}

impl Owned for Plan {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for Week {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for TrainingSession {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

impl Owned for ActivityDetails {
    fn owner(&self) -> Uuid {
        self.activity.user_id
    }
}

impl Owned for CombinedGroup {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

fn missing(label: &str, id: &dyn Display) -> AppError {
    AppError::not_found(format!("{label} {id}")).with_resource_id(id.to_string())
}

fn not_owned(label: &str, id: &dyn Display, caller: Uuid) -> AppError {
    AppError::forbidden(format!("{label} {id}"))
        .with_resource_id(id.to_string())
        .with_user_id(caller)
}

/// Fail with 404 for a missing row and 403 for a row owned by someone else
pub(crate) fn ensure_owner(
    label: &str,
    id: impl Display,
    owner: Option<Uuid>,
    caller: Uuid,
) -> AppResult<()> {
    match owner {
        None => Err(missing(label, &id)),
        Some(owner) if owner == caller => Ok(()),
        Some(_) => Err(not_owned(label, &id, caller)),
    }
}

/// Unwrap a fetched row after the same 404/403 checks as [`ensure_owner`]
pub(crate) fn owned_row<T: Owned>(
    label: &str,
    id: impl Display,
    row: Option<T>,
    caller: Uuid,
) -> AppResult<T> {
    match row {
        None => Err(missing(label, &id)),
        Some(row) if row.owner() == caller => Ok(row),
        Some(_) => Err(not_owned(label, &id, caller)),
    }
}

/// Owner of row `id`, `None` when it does not exist
pub(crate) async fn owner_of(
    pool: &SqlitePool,
    table: OwnedTable,
    id: i64,
) -> AppResult<Option<Uuid>> {
    let query = format!("SELECT user_id FROM {} WHERE id = $1", table.table());
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to look up {}: {e}", table.label()))
        })?;

    row.map(|r| parse_uuid(&r.try_get::<String, _>("user_id")?))
        .transpose()
}

/// Check that `caller` owns row `id`
pub(crate) async fn authorize(
    pool: &SqlitePool,
    table: OwnedTable,
    id: i64,
    caller: Uuid,
) -> AppResult<()> {
    let owner = owner_of(pool, table, id).await?;
    ensure_owner(table.label(), id, owner, caller)
}

/// Explain an UPDATE that failed or matched no rows
///
/// A row deleted between the ownership check and the write reports 404;
/// otherwise the original failure is kept.
pub(crate) async fn resolve_update_failure(
    pool: &SqlitePool,
    table: OwnedTable,
    id: i64,
    failure: Option<AppError>,
) -> AppError {
    match owner_of(pool, table, id).await {
        Ok(None) => missing(table.label(), &id),
        Ok(Some(_)) => failure.unwrap_or_else(|| {
            AppError::conflict(format!("{} {id} changed during update", table.label()))
        }),
        Err(lookup_error) => failure.unwrap_or(lookup_error),
    }
}

/// Parse a UUID stored as TEXT
pub(crate) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID in database: {e}")))
}

/// Parse an optional UUID stored as nullable TEXT
pub(crate) fn parse_optional_uuid(value: Option<String>) -> AppResult<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

/// Parse an RFC 3339 timestamp stored as TEXT
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid timestamp in database: {e}")))
}

/// Convert a stored INTEGER into an unsigned count
pub(crate) fn to_u32(field: &str, value: i64) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::internal(format!("Stored {field} out of range: {value}")))
}
