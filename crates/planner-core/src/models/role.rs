// ABOUTME: Staff role reference data (head coach, assistant, physio, ...)
// ABOUTME: Roles are global and not owned by any user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::validation::required_text;
use crate::constants::limits;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Database identifier
    pub id: i64,
    /// Unique display name
    pub name: String,
}

/// Request to create or rename a role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRequest {
    /// Display name
    pub name: String,
}

impl RoleRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank or oversized name
    pub fn validate(&self) -> AppResult<()> {
        required_text("name", &self.name, limits::MAX_NAME_LENGTH)
    }
}
