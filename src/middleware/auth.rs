// ABOUTME: Bearer token authentication for API requests
// ABOUTME: Extracts the Authorization header and resolves it to the calling user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use crate::auth::{AuthManager, AuthResult};
use crate::errors::{AppError, AppResult};
use http::{header::AUTHORIZATION, HeaderMap};

/// Bearer scheme prefix
const BEARER_PREFIX: &str = "Bearer ";

/// Authenticates requests carrying a provider access token
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: AuthManager) -> Self {
        Self { auth_manager }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no usable Authorization header is present,
    /// `AuthExpired` for an expired token, and `AuthInvalid` otherwise
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let header = headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AppError::auth_invalid("Authorization header is not valid text"))
            })
            .transpose()?;
        self.authenticate_request(header)
    }

    /// Authenticate a request from its Authorization header value
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the header is missing, `AuthInvalid` for a
    /// non-bearer scheme or a rejected token, and `AuthExpired` for an
    /// expired token
    #[tracing::instrument(
        skip(self, auth_header),
        fields(
            auth_method = tracing::field::Empty,
            user_id = tracing::field::Empty,
            success = tracing::field::Empty,
        )
    )]
    pub fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let Some(header) = auth_header else {
            tracing::Span::current().record("success", false);
            tracing::debug!("Request has no Authorization header");
            return Err(AppError::auth_required());
        };

        let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
            tracing::Span::current().record("success", false);
            tracing::warn!("Authorization header does not use the Bearer scheme");
            return Err(AppError::auth_invalid(
                "Authorization header must use the Bearer scheme",
            ));
        };

        tracing::Span::current().record("auth_method", "JWT");
        match self.auth_manager.validate_token(token.trim()) {
            Ok(result) => {
                tracing::Span::current()
                    .record("user_id", result.user_id.to_string())
                    .record("success", true);
                tracing::debug!(user_id = %result.user_id, "Request authenticated");
                Ok(result)
            }
            Err(error) => {
                tracing::Span::current().record("success", false);
                tracing::warn!(code = ?error.code, "Authentication failed: {}", error.message);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::errors::ErrorCode;
    use uuid::Uuid;

    fn middleware() -> (AuthMiddleware, AuthManager) {
        let manager = AuthManager::new(&AuthConfig {
            provider_url: "https://project.auth.test".to_owned(),
            jwt_secret: "middleware-secret".to_owned(),
            audience: "authenticated".to_owned(),
        });
        (AuthMiddleware::new(manager.clone()), manager)
    }

    #[test]
    fn test_missing_header_requires_auth() {
        let (middleware, _) = middleware();
        let error = middleware.authenticate_request(None).unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthRequired);
    }

    #[test]
    fn test_non_bearer_scheme_is_invalid() {
        let (middleware, _) = middleware();
        let error = middleware
            .authenticate_request(Some("Basic dXNlcjpwYXNz"))
            .unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthInvalid);
    }

    #[test]
    fn test_bearer_token_resolves_user() {
        let (middleware, manager) = middleware();
        let user_id = Uuid::new_v4();
        let token = manager.generate_token(user_id, None).unwrap();

        let result = middleware
            .authenticate_request(Some(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(result.user_id, user_id);
    }
}
