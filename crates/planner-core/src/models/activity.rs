// ABOUTME: Activity model, activity formats, and the joined read view used by analytics
// ABOUTME: An activity is a timed unit of work tagged with a category and exercise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::validation::{in_range, optional_text};
use crate::constants::limits;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an activity is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActivityFormat {
    /// Warm-up block
    WarmUp,
    /// Isolated drill
    #[default]
    Drill,
    /// Internal match play
    Scrimmage,
    /// Friendly match
    FriendlyGame,
    /// Competitive match
    OfficialGame,
    /// Cool-down block
    CoolDown,
    /// Recreational play
    Recreational,
    /// Team meeting or video session
    Meeting,
}

impl ActivityFormat {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WarmUp => "WarmUp",
            Self::Drill => "Drill",
            Self::Scrimmage => "Scrimmage",
            Self::FriendlyGame => "FriendlyGame",
            Self::OfficialGame => "OfficialGame",
            Self::CoolDown => "CoolDown",
            Self::Recreational => "Recreational",
            Self::Meeting => "Meeting",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "WarmUp" => Self::WarmUp,
            "Scrimmage" => Self::Scrimmage,
            "FriendlyGame" => Self::FriendlyGame,
            "OfficialGame" => Self::OfficialGame,
            "CoolDown" => Self::CoolDown,
            "Recreational" => Self::Recreational,
            "Meeting" => Self::Meeting,
            _ => Self::Drill,
        }
    }
}

/// Timed unit of work within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Database identifier
    pub id: i64,
    /// Parent session
    pub session_id: i64,
    /// Owner, copied from the session
    pub user_id: Uuid,
    /// Nominal duration in minutes
    pub duration_minutes: u32,
    /// How the activity is run
    pub format: ActivityFormat,
    /// Category; cleared if the category is deleted
    pub category_id: Option<i64>,
    /// Exercise; cleared if the exercise is deleted
    pub exercise_id: Option<i64>,
    /// Selected exercise variation
    pub variation: Option<String>,
    /// Activities sharing a group ran simultaneously
    pub combined_group_id: Option<Uuid>,
}

/// Activity joined with its category and exercise names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    /// The stored activity
    #[serde(flatten)]
    pub activity: Activity,
    /// Category name, absent when the category is gone
    pub category_name: Option<String>,
    /// Exercise name, absent when the exercise is gone
    pub exercise_name: Option<String>,
}

/// Request to create an activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivityRequest {
    /// Nominal duration in minutes (1..=600)
    pub duration_minutes: u32,
    /// How the activity is run
    #[serde(default)]
    pub format: ActivityFormat,
    /// Category to file the activity under
    pub category_id: i64,
    /// Exercise performed
    pub exercise_id: i64,
    /// Selected variation, required when the exercise offers any
    #[serde(default)]
    pub variation: Option<String>,
    /// Existing activities in the same session that ran at the same time
    #[serde(default)]
    pub combine_with: Vec<i64>,
}

impl CreateActivityRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for a duration outside 1..=600 minutes or an
    /// oversized variation name
    pub fn validate(&self) -> AppResult<()> {
        validate_activity_fields(self.duration_minutes, self.variation.as_deref())
    }
}

/// Request to replace an activity's editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    /// Nominal duration in minutes (1..=600)
    pub duration_minutes: u32,
    /// How the activity is run
    #[serde(default)]
    pub format: ActivityFormat,
    /// Category to file the activity under
    pub category_id: i64,
    /// Exercise performed
    pub exercise_id: i64,
    /// Selected variation
    #[serde(default)]
    pub variation: Option<String>,
}

impl UpdateActivityRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for a duration outside 1..=600 minutes or an
    /// oversized variation name
    pub fn validate(&self) -> AppResult<()> {
        validate_activity_fields(self.duration_minutes, self.variation.as_deref())
    }
}

fn validate_activity_fields(duration_minutes: u32, variation: Option<&str>) -> AppResult<()> {
    in_range(
        "duration_minutes",
        duration_minutes,
        limits::MIN_ACTIVITY_MINUTES..=limits::MAX_ACTIVITY_MINUTES,
    )?;
    optional_text("variation", variation, limits::MAX_NAME_LENGTH)
}
