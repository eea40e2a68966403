// ABOUTME: Loads nested plan, week, and session views with real-duration totals
// ABOUTME: Fetches a whole subtree in two queries and aggregates it in memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::activities::{row_to_activity_details, ACTIVITY_DETAILS_SELECT};
use super::plans::PlansManager;
use super::sessions::{row_to_session, SessionsManager};
use super::weeks::WeeksManager;
use crate::errors::{AppError, AppResult};
use planner_analytics::calc_real_duration;
use planner_core::models::{ActivityDetails, PlanDetails, SessionDetails, WeekDetails};
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;

/// Subtree to load
#[derive(Debug, Clone, Copy)]
enum Scope {
    Plan(i64),
    Week(i64),
    Session(i64),
}

impl Scope {
    const fn id(self) -> i64 {
        match self {
            Self::Plan(id) | Self::Week(id) | Self::Session(id) => id,
        }
    }

    const fn sessions_filter(self) -> &'static str {
        match self {
            Self::Plan(_) => "JOIN weeks w ON w.id = s.week_id WHERE w.plan_id = $1",
            Self::Week(_) => "WHERE s.week_id = $1",
            Self::Session(_) => "WHERE s.id = $1",
        }
    }

    const fn activities_filter(self) -> &'static str {
        match self {
            Self::Plan(_) => {
                "JOIN sessions s ON s.id = a.session_id JOIN weeks w ON w.id = s.week_id WHERE w.plan_id = $1"
            }
            Self::Week(_) => "JOIN sessions s ON s.id = a.session_id WHERE s.week_id = $1",
            Self::Session(_) => "WHERE a.session_id = $1",
        }
    }
}

/// Read-only loader for nested views
pub struct HierarchyLoader {
    pool: SqlitePool,
}

impl HierarchyLoader {
    /// Create a new hierarchy loader
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A plan with its weeks, sessions, and activities
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied` for the plan
    pub async fn plan_details(&self, plan_id: i64, user_id: Uuid) -> AppResult<PlanDetails> {
        let plan = PlansManager::new(self.pool.clone())
            .get(plan_id, user_id)
            .await?;
        let weeks = WeeksManager::new(self.pool.clone())
            .list_for_plan(plan_id, user_id)
            .await?;

        let mut by_week: HashMap<i64, Vec<SessionDetails>> = HashMap::new();
        for session in self.load(Scope::Plan(plan_id)).await? {
            by_week
                .entry(session.session.week_id)
                .or_default()
                .push(session);
        }

        let weeks: Vec<WeekDetails> = weeks
            .into_iter()
            .map(|week| {
                let sessions = by_week.remove(&week.id).unwrap_or_default();
                WeekDetails {
                    total_minutes: sessions.iter().map(|s| s.total_minutes).sum(),
                    week,
                    sessions,
                }
            })
            .collect();

        Ok(PlanDetails {
            total_minutes: weeks.iter().map(|w| w.total_minutes).sum(),
            plan,
            weeks,
        })
    }

    /// A week with its sessions and activities
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied` for the week
    pub async fn week_details(&self, week_id: i64, user_id: Uuid) -> AppResult<WeekDetails> {
        let week = WeeksManager::new(self.pool.clone())
            .get(week_id, user_id)
            .await?;
        let sessions = self.load(Scope::Week(week_id)).await?;

        Ok(WeekDetails {
            total_minutes: sessions.iter().map(|s| s.total_minutes).sum(),
            week,
            sessions,
        })
    }

    /// A session with its activities and real duration
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied` for the session
    pub async fn session_details(
        &self,
        session_id: i64,
        user_id: Uuid,
    ) -> AppResult<SessionDetails> {
        SessionsManager::new(self.pool.clone())
            .get(session_id, user_id)
            .await?;

        self.load(Scope::Session(session_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("Session {session_id}")))
    }

    /// Every session of a plan in date order, for analytics
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `PermissionDenied` for the plan
    pub async fn plan_sessions(
        &self,
        plan_id: i64,
        user_id: Uuid,
    ) -> AppResult<Vec<SessionDetails>> {
        PlansManager::new(self.pool.clone())
            .get(plan_id, user_id)
            .await?;
        self.load(Scope::Plan(plan_id)).await
    }

    async fn load(&self, scope: Scope) -> AppResult<Vec<SessionDetails>> {
        let sessions_query = format!(
            r"
            SELECT s.id AS id, s.week_id AS week_id, s.user_id AS user_id, s.date AS date,
                   s.period AS period, s.is_rest_day AS is_rest_day, s.notes AS notes,
                   s.created_at AS created_at
            FROM sessions s {}
            ORDER BY s.date, s.id
            ",
            scope.sessions_filter()
        );
        let session_rows = sqlx::query(&sessions_query)
            .bind(scope.id())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load sessions: {e}")))?;

        let activities_query = format!(
            "{ACTIVITY_DETAILS_SELECT} {} ORDER BY a.id",
            scope.activities_filter()
        );
        let activity_rows = sqlx::query(&activities_query)
            .bind(scope.id())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load activities: {e}")))?;

        let mut by_session: HashMap<i64, Vec<ActivityDetails>> = HashMap::new();
        for row in &activity_rows {
            let activity = row_to_activity_details(row)?;
            by_session
                .entry(activity.activity.session_id)
                .or_default()
                .push(activity);
        }

        session_rows
            .iter()
            .map(|row| {
                let session = row_to_session(row)?;
                let activities = by_session.remove(&session.id).unwrap_or_default();
                Ok(SessionDetails {
                    total_minutes: calc_real_duration(&activities),
                    session,
                    activities,
                })
            })
            .collect()
    }
}
