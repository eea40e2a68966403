// ABOUTME: Bearer token verification for tokens issued by the hosted auth provider
// ABOUTME: Validates HS256 signatures, issuer, audience, and expiry and yields the caller's user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! # Authentication
//!
//! Users sign in with the external auth provider; this service only verifies
//! the access tokens it issues. A token is accepted when its HS256 signature
//! matches the shared secret, `iss` is `{provider}/auth/v1`, `aud` matches
//! the configured audience, and `exp` is in the future. The `sub` claim is
//! the user id every owned row is keyed by.

use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use planner_core::constants::auth::DEFAULT_TOKEN_EXPIRY_HOURS;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a token was rejected
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Signature, issuer, audience, or subject did not check out
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is not a well-formed `JWT`
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let minutes = current_time.signed_duration_since(*expired_at).num_minutes();
                write!(
                    f,
                    "JWT token expired {minutes} minutes ago at {}",
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            other => Self::auth_invalid(other.to_string()),
        }
    }
}

/// `JWT` claims carried by provider access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// User email, when the provider includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience
    pub aud: String,
    /// Issuer
    pub iss: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Provider role, e.g. `authenticated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// Owner id for every row the caller touches
    pub user_id: Uuid,
    /// Email from the token, if present
    pub email: Option<String>,
}

/// Verifies provider tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl AuthManager {
    /// Create a manager from the auth configuration
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer(),
            audience: config.audience.clone(),
        }
    }

    /// Expected issuer claim
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a token the way the provider does, for tooling and tests
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn generate_token(&self, user_id: Uuid, email: Option<&str>) -> AppResult<String> {
        self.generate_token_with_expiry(
            user_id,
            email,
            Utc::now() + Duration::hours(DEFAULT_TOKEN_EXPIRY_HOURS),
        )
    }

    /// Sign a token expiring at `expires_at`
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn generate_token_with_expiry(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(ToOwned::to_owned),
            aud: self.audience.clone(),
            iss: self.issuer.clone(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            role: Some(self.audience.clone()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and return the caller
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` for an expired token and `AuthInvalid` for any
    /// other rejection
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let claims = self.validate_token_detailed(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AppError::from(JwtValidationError::TokenInvalid {
                reason: "subject is not a user id".into(),
            })
        })?;

        Ok(AuthResult {
            user_id,
            email: claims.email,
        })
    }

    /// Validate a token with detailed error information
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the signature, issuer, or audience
    /// does not match, the token is malformed, or it has expired
    pub fn validate_token_detailed(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| convert_jwt_error(&e))?;

        let current_time = Utc::now();
        if current_time.timestamp() >= claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(current_time);
            tracing::warn!(
                user_id = %claims.sub,
                expired_at = %expired_at.to_rfc3339(),
                "JWT token expired"
            );
            return Err(JwtValidationError::TokenExpired {
                expired_at,
                current_time,
            });
        }

        tracing::debug!(user_id = %claims.sub, "JWT token validated");
        Ok(claims)
    }
}

fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
    use jsonwebtoken::errors::ErrorKind;
    tracing::warn!("JWT token validation failed: {e:?}");

    match e.kind() {
        ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
            reason: "Token signature verification failed".into(),
        },
        ErrorKind::InvalidIssuer => JwtValidationError::TokenInvalid {
            reason: "Token issuer does not match".into(),
        },
        ErrorKind::InvalidAudience => JwtValidationError::TokenInvalid {
            reason: "Token audience does not match".into(),
        },
        ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
            details: "Token format is invalid".into(),
        },
        ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
            details: format!("Token contains invalid base64: {base64_err}"),
        },
        ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
            details: format!("Token contains invalid JSON: {json_err}"),
        },
        ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
            details: format!("Token contains invalid UTF-8: {utf8_err}"),
        },
        _ => JwtValidationError::TokenInvalid {
            reason: format!("Token validation failed: {e}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn manager(secret: &str) -> AuthManager {
        AuthManager::new(&AuthConfig {
            provider_url: "https://project.auth.test".to_owned(),
            jwt_secret: secret.to_owned(),
            audience: "authenticated".to_owned(),
        })
    }

    #[test]
    fn test_round_trip_yields_user() {
        let auth = manager("test-secret");
        let user_id = Uuid::new_v4();
        let token = auth.generate_token(user_id, Some("coach@example.com")).unwrap();

        let result = auth.validate_token(&token).unwrap();
        assert_eq!(result.user_id, user_id);
        assert_eq!(result.email.as_deref(), Some("coach@example.com"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = manager("test-secret");
        let token = auth
            .generate_token_with_expiry(Uuid::new_v4(), None, Utc::now() - Duration::minutes(5))
            .unwrap();

        let error = auth.validate_token(&token).unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthExpired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager("one-secret")
            .generate_token(Uuid::new_v4(), None)
            .unwrap();

        let error = manager("other-secret").validate_token(&token).unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthInvalid);
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = manager("shared").generate_token(Uuid::new_v4(), None).unwrap();
        let other = AuthManager::new(&AuthConfig {
            provider_url: "https://elsewhere.auth.test".to_owned(),
            jwt_secret: "shared".to_owned(),
            audience: "authenticated".to_owned(),
        });

        assert!(matches!(
            other.validate_token_detailed(&token),
            Err(JwtValidationError::TokenInvalid { .. })
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            manager("s").validate_token_detailed("not-a-jwt"),
            Err(JwtValidationError::TokenMalformed { .. })
        ));
    }
}
