// ABOUTME: Field-level validation helpers shared by all request records
// ABOUTME: Checks required text, maximum lengths, and numeric ranges with typed errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use crate::errors::{AppError, AppResult};
use std::fmt::Display;
use std::ops::RangeInclusive;

/// Require a non-blank string no longer than `max_len` characters
///
/// # Errors
///
/// Returns `MissingRequiredField` for blank input and `ValueOutOfRange` when too long
pub fn required_text(field: &str, value: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::missing_field(field));
    }
    max_length(field, value, max_len)
}

/// Accept an absent string, otherwise enforce the length limit
///
/// # Errors
///
/// Returns `ValueOutOfRange` when the value is too long
pub fn optional_text(field: &str, value: Option<&str>, max_len: usize) -> AppResult<()> {
    value.map_or(Ok(()), |v| max_length(field, v, max_len))
}

fn max_length(field: &str, value: &str, max_len: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::out_of_range(
            field,
            format!("Field '{field}' must be at most {max_len} characters (got {len})"),
        ));
    }
    Ok(())
}

/// Require a value within an inclusive range
///
/// # Errors
///
/// Returns `ValueOutOfRange` when the value falls outside `range`
pub fn in_range<T>(field: &str, value: T, range: RangeInclusive<T>) -> AppResult<()>
where
    T: PartialOrd + Display + Copy,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(AppError::out_of_range(
            field,
            format!(
                "Field '{field}' must be between {} and {} (got {value})",
                range.start(),
                range.end()
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_required_text_rejects_blank() {
        let err = required_text("team_name", "   ", 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert!(required_text("name", &name, 100).is_ok());
        let err = required_text("name", &format!("{name}x"), 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_in_range_is_inclusive() {
        assert!(in_range("duration_minutes", 1, 1..=600).is_ok());
        assert!(in_range("duration_minutes", 600, 1..=600).is_ok());
        assert!(in_range("duration_minutes", 0, 1..=600).is_err());
        assert!(in_range("duration_minutes", 601, 1..=600).is_err());
    }
}
