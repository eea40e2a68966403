// ABOUTME: Plan (macrocycle) model and its create/update request records
// ABOUTME: A plan is a season-long program for one team, owned by exactly one user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::validation::{in_range, required_text};
use crate::constants::{defaults, limits};
use crate::errors::AppResult;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Season-long training program (macrocycle)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Database identifier
    pub id: i64,
    /// Owner of the plan and everything below it
    pub user_id: Uuid,
    /// Season year
    pub year: i32,
    /// Team the plan is written for
    pub team_name: String,
    /// Coach responsible for the plan
    pub coach_name: String,
    /// First day of the season
    pub start_date: NaiveDate,
    /// Number of weeks generated at creation
    pub duration_weeks: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Request to create a plan together with its weeks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanRequest {
    /// Team the plan is written for
    pub team_name: String,
    /// Coach responsible for the plan
    pub coach_name: String,
    /// First day of the season; the year is taken from it
    pub start_date: NaiveDate,
    /// Number of weeks to generate (defaults to a full season)
    #[serde(default)]
    pub duration_weeks: Option<u32>,
}

impl CreatePlanRequest {
    /// Weeks to generate, falling back to the season default
    #[must_use]
    pub fn effective_duration(&self) -> u32 {
        self.duration_weeks
            .unwrap_or(defaults::PLAN_DURATION_WEEKS)
    }

    /// Season year derived from the start date
    #[must_use]
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or oversized names, a year outside
    /// the supported range, or a duration outside 1..=53 weeks
    pub fn validate(&self) -> AppResult<()> {
        required_text("team_name", &self.team_name, limits::MAX_NAME_LENGTH)?;
        required_text("coach_name", &self.coach_name, limits::MAX_NAME_LENGTH)?;
        in_range(
            "start_date",
            self.year(),
            limits::MIN_PLAN_YEAR..=limits::MAX_PLAN_YEAR,
        )?;
        in_range(
            "duration_weeks",
            self.effective_duration(),
            1..=limits::MAX_PLAN_WEEKS,
        )
    }
}

/// Request to replace a plan's editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePlanRequest {
    /// Season year
    pub year: i32,
    /// Team the plan is written for
    pub team_name: String,
    /// Coach responsible for the plan
    pub coach_name: String,
}

impl UpdatePlanRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank or oversized names or a year out of range
    pub fn validate(&self) -> AppResult<()> {
        in_range(
            "year",
            self.year,
            limits::MIN_PLAN_YEAR..=limits::MAX_PLAN_YEAR,
        )?;
        required_text("team_name", &self.team_name, limits::MAX_NAME_LENGTH)?;
        required_text("coach_name", &self.coach_name, limits::MAX_NAME_LENGTH)
    }
}
