// ABOUTME: Combined group model for activities performed simultaneously
// ABOUTME: A group has at least two member activities, all from the same session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Set of activities that ran at the same time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedGroup {
    /// Group identifier, stored on each member activity
    pub id: Uuid,
    /// Session every member belongs to
    pub session_id: i64,
    /// Owner, copied from the session
    pub user_id: Uuid,
    /// Member activity ids in ascending order
    pub member_ids: Vec<i64>,
}

/// Request to create a group or replace its membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedGroupRequest {
    /// Activities to combine
    pub activity_ids: Vec<i64>,
}

impl CombinedGroupRequest {
    /// Distinct member ids in ascending order
    #[must_use]
    pub fn distinct_ids(&self) -> Vec<i64> {
        self.activity_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Validate the group size
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when fewer than two distinct activities are given
    pub fn validate(&self) -> AppResult<()> {
        let count = self.distinct_ids().len();
        if count < limits::MIN_COMBINED_GROUP_SIZE {
            return Err(AppError::invalid_input(format!(
                "A combined group needs at least {} distinct activities (got {count})",
                limits::MIN_COMBINED_GROUP_SIZE
            ))
            .with_details(serde_json::json!({ "field": "activity_ids" })));
        }
        Ok(())
    }
}
