// ABOUTME: Nested read views of the plan hierarchy with real-duration totals
// ABOUTME: Used by detail endpoints and as input to analytics rollups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::{ActivityDetails, Plan, TrainingSession, Week};
use serde::{Deserialize, Serialize};

/// Session with its activities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetails {
    /// The session
    #[serde(flatten)]
    pub session: TrainingSession,
    /// Elapsed minutes, counting each combined group once
    pub total_minutes: f64,
    /// Activities in insertion order
    pub activities: Vec<ActivityDetails>,
}

/// Week with its sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekDetails {
    /// The week
    #[serde(flatten)]
    pub week: Week,
    /// Sum of the sessions' elapsed minutes
    pub total_minutes: f64,
    /// Sessions ordered by date
    pub sessions: Vec<SessionDetails>,
}

/// Plan with its weeks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDetails {
    /// The plan
    #[serde(flatten)]
    pub plan: Plan,
    /// Sum of the weeks' elapsed minutes
    pub total_minutes: f64,
    /// Weeks ordered by week number
    pub weeks: Vec<WeekDetails>,
}
