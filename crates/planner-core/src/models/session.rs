// ABOUTME: Training session model with time-of-day period and rest-day flag
// ABOUTME: A session belongs to one week and holds zero or more activities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::validation::optional_text;
use crate::constants::limits;
use crate::errors::AppResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Time of day a session takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// Before noon
    Morning,
    /// Noon to early evening
    Afternoon,
    /// Late sessions
    Evening,
}

impl Period {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Morning" => Some(Self::Morning),
            "Afternoon" => Some(Self::Afternoon),
            "Evening" => Some(Self::Evening),
            _ => None,
        }
    }
}

/// A single day's training block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Database identifier
    pub id: i64,
    /// Parent week
    pub week_id: i64,
    /// Owner, copied from the week
    pub user_id: Uuid,
    /// Day of training
    pub date: NaiveDate,
    /// Optional time of day
    pub period: Option<Period>,
    /// Rest days never carry activities
    pub is_rest_day: bool,
    /// Coach notes about goals or outcomes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Request to create or replace a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Day of training
    pub date: NaiveDate,
    /// Optional time of day
    #[serde(default)]
    pub period: Option<Period>,
    /// Mark the session as a rest day
    #[serde(default)]
    pub is_rest_day: bool,
    /// Coach notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl SessionRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when notes exceed 500 characters
    pub fn validate(&self) -> AppResult<()> {
        optional_text("notes", self.notes.as_deref(), limits::MAX_NOTES_LENGTH)
    }
}
