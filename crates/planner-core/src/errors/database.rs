// ABOUTME: Conversion from sqlx errors into AppError
// ABOUTME: Maps missing rows and constraint violations onto client-facing error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::{AppError, ErrorCode};

/// Classify a constraint violation reported by the database driver
fn constraint_violation(error: &sqlx::Error) -> Option<(ErrorCode, String)> {
    let sqlx::Error::Database(db_error) = error else {
        return None;
    };

    if db_error.is_unique_violation() {
        Some((
            ErrorCode::ResourceAlreadyExists,
            format!("Duplicate value: {}", db_error.message()),
        ))
    } else if db_error.is_foreign_key_violation() {
        Some((
            ErrorCode::InvalidInput,
            format!("Referenced record is missing or in use: {}", db_error.message()),
        ))
    } else if db_error.is_check_violation() {
        Some((
            ErrorCode::ValueOutOfRange,
            format!("Value rejected by schema: {}", db_error.message()),
        ))
    } else {
        None
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        if matches!(error, sqlx::Error::RowNotFound) {
            return Self::not_found("Record");
        }

        match constraint_violation(&error) {
            Some((code, message)) => Self::new(code, message).with_source(error),
            None => Self::database(error.to_string()).with_source(error),
        }
    }
}
