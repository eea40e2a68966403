// ABOUTME: Category and exercise reference data, either standard or user-owned
// ABOUTME: Exercises belong to one category and may offer named variations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::validation::{optional_text, required_text};
use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Activity category (Technical, Tactical, Physical, or user-defined)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Database identifier
    pub id: i64,
    /// Owner; `None` for standard categories
    pub user_id: Option<Uuid>,
    /// Display name
    pub name: String,
}

impl Category {
    /// Standard categories are shared by every user
    #[must_use]
    pub const fn is_standard(&self) -> bool {
        self.user_id.is_none()
    }

    /// Visible to `user_id` when standard or owned by them
    #[must_use]
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.user_id.map_or(true, |owner| owner == user_id)
    }
}

/// Category together with its visible exercises
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithExercises {
    /// The category
    #[serde(flatten)]
    pub category: Category,
    /// Exercises visible to the caller
    pub exercises: Vec<Exercise>,
}

/// Request to create or rename a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    /// Display name
    pub name: String,
}

impl CategoryRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank or oversized name
    pub fn validate(&self) -> AppResult<()> {
        required_text("name", &self.name, limits::MAX_NAME_LENGTH)
    }
}

/// Exercise within a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Database identifier
    pub id: i64,
    /// Parent category
    pub category_id: i64,
    /// Owner; `None` for standard exercises
    pub user_id: Option<Uuid>,
    /// Display name
    pub name: String,
    /// Free-text description
    pub description: Option<String>,
    /// Named variations a coach picks from
    pub variations: Vec<String>,
    /// Legacy single free-text variation
    pub combinations: Option<String>,
}

impl Exercise {
    /// Variations a caller may pick from
    ///
    /// The variation list wins when non-empty; otherwise the legacy
    /// combinations text counts as a single variation.
    #[must_use]
    pub fn available_variations(&self) -> Vec<String> {
        if !self.variations.is_empty() {
            return self.variations.clone();
        }
        self.combinations
            .as_ref()
            .filter(|c| !c.trim().is_empty())
            .map(|c| vec![c.clone()])
            .unwrap_or_default()
    }

    /// Check that `selected` is acceptable for this exercise
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when variations exist but none was chosen,
    /// and `InvalidInput` when the choice is not one of them
    pub fn check_variation(&self, selected: Option<&str>) -> AppResult<()> {
        let available = self.available_variations();
        match selected {
            None if available.is_empty() => Ok(()),
            None => Err(AppError::missing_field("variation")),
            Some(choice) if available.iter().any(|v| v == choice) => Ok(()),
            Some(choice) => Err(AppError::invalid_input(format!(
                "Variation '{choice}' is not offered by exercise '{}'",
                self.name
            ))
            .with_details(serde_json::json!({
                "field": "variation",
                "available": available,
            }))),
        }
    }

    /// Visible to `user_id` when standard or owned by them
    #[must_use]
    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.user_id.map_or(true, |owner| owner == user_id)
    }
}

/// Request to create or replace an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRequest {
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Named variations
    #[serde(default)]
    pub variations: Vec<String>,
    /// Legacy single free-text variation
    #[serde(default)]
    pub combinations: Option<String>,
}

impl ExerciseRequest {
    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank or oversized name, an oversized
    /// description, or a blank or oversized variation
    pub fn validate(&self) -> AppResult<()> {
        required_text("name", &self.name, limits::MAX_NAME_LENGTH)?;
        optional_text(
            "description",
            self.description.as_deref(),
            limits::MAX_NOTES_LENGTH,
        )?;
        optional_text(
            "combinations",
            self.combinations.as_deref(),
            limits::MAX_NOTES_LENGTH,
        )?;
        for variation in &self.variations {
            required_text("variations", variation, limits::MAX_NAME_LENGTH)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn exercise(variations: &[&str], combinations: Option<&str>) -> Exercise {
        Exercise {
            id: 1,
            category_id: 1,
            user_id: None,
            name: "Rondo".to_owned(),
            description: None,
            variations: variations.iter().map(|v| (*v).to_owned()).collect(),
            combinations: combinations.map(str::to_owned),
        }
    }

    #[test]
    fn test_variations_take_precedence_over_combinations() {
        let ex = exercise(&["4v2", "5v2"], Some("legacy"));
        assert_eq!(ex.available_variations(), vec!["4v2", "5v2"]);
    }

    #[test]
    fn test_legacy_combinations_become_single_variation() {
        let ex = exercise(&[], Some("3 touches max"));
        assert_eq!(ex.available_variations(), vec!["3 touches max"]);
        assert!(exercise(&[], None).available_variations().is_empty());
    }

    #[test]
    fn test_variation_required_when_available() {
        let ex = exercise(&["4v2"], None);
        assert_eq!(
            ex.check_variation(None).unwrap_err().code,
            ErrorCode::MissingRequiredField
        );
        assert_eq!(
            ex.check_variation(Some("6v3")).unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert!(ex.check_variation(Some("4v2")).is_ok());
        assert!(exercise(&[], None).check_variation(None).is_ok());
    }

    #[test]
    fn test_visibility() {
        let me = Uuid::new_v4();
        let standard = Category {
            id: 1,
            user_id: None,
            name: "Technical".to_owned(),
        };
        let other = Category {
            id: 2,
            user_id: Some(Uuid::new_v4()),
            name: "Set pieces".to_owned(),
        };
        assert!(standard.is_standard());
        assert!(standard.is_visible_to(me));
        assert!(!other.is_visible_to(me));
    }
}
