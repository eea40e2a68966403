// ABOUTME: Week (microcycle) model and its request records
// ABOUTME: A week belongs to one plan and spans a Monday-to-Sunday date range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::validation::in_range;
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One calendar week within a plan (microcycle)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Database identifier
    pub id: i64,
    /// Parent plan
    pub plan_id: i64,
    /// Owner, copied from the plan
    pub user_id: Uuid,
    /// Position in the plan, starting at 1
    pub week_number: u32,
    /// First day of the week
    pub start_date: NaiveDate,
    /// Last day of the week
    pub end_date: NaiveDate,
}

impl Week {
    /// Whether `date` falls inside this week
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Request to create or replace a week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekRequest {
    /// Position in the plan
    pub week_number: u32,
    /// First day of the week
    pub start_date: NaiveDate,
    /// Last day of the week
    pub end_date: NaiveDate,
}

impl WeekRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for a week number outside 1..=53, a start
    /// date that is not a Monday, or an end date other than the following Sunday
    pub fn validate(&self) -> AppResult<()> {
        in_range(
            "week_number",
            self.week_number,
            limits::MIN_WEEK_NUMBER..=limits::MAX_WEEK_NUMBER,
        )?;
        if self.start_date.weekday() != Weekday::Mon {
            return Err(AppError::invalid_input(format!(
                "start_date {} is a {}, weeks start on Monday",
                self.start_date,
                self.start_date.weekday()
            ))
            .with_details(serde_json::json!({ "field": "start_date" })));
        }
        let sunday = self.start_date.checked_add_days(Days::new(6));
        if sunday != Some(self.end_date) {
            return Err(AppError::invalid_input(format!(
                "end_date {} must be the Sunday after start_date {}",
                self.end_date, self.start_date
            ))
            .with_details(serde_json::json!({ "field": "end_date" })));
        }
        Ok(())
    }

    /// Whether this week's range shares a day with `other`
    #[must_use]
    pub fn overlaps(&self, other: &Week) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}
