// ABOUTME: Axum IntoResponse integration for AppError
// ABOUTME: Renders errors as JSON bodies with the status code mapped from ErrorCode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use super::{AppError, ErrorResponse};
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                code = ?self.code,
                resource_id = ?self.context.resource_id,
                source = ?self.source,
                "Request failed: {}",
                self.message
            );
        } else {
            tracing::debug!(code = ?self.code, "Request rejected: {}", self.message);
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_status_follows_error_code() {
        let response = AppError::forbidden("Plan 3").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = AppError::new(ErrorCode::ResourceConflict, "stale").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::database("disk full").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
