// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database URL, CORS origins, and auth provider settings from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Environment-based configuration for the HTTP server

use anyhow::{Context, Result};
use planner_core::constants::{auth, ports};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Default database location
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/season_planner.db";

/// Default allowed CORS origin (local frontend dev server)
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

/// Default per-request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Deployed service
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database file
    SQLite {
        /// File location
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string; anything without a `sqlite:` prefix is a file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path = s.strip_prefix("sqlite:").unwrap_or(s);
        if path == ":memory:" {
            Self::Memory
        } else {
            Self::SQLite {
                path: PathBuf::from(path),
            }
        }
    }

    /// Convert to a sqlx connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

/// Token verification settings for the external auth provider
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the auth provider; the token issuer is derived from it
    pub provider_url: String,
    /// Shared HS256 secret used to verify tokens
    pub jwt_secret: String,
    /// Expected `aud` claim
    pub audience: String,
}

impl AuthConfig {
    /// Expected `iss` claim
    #[must_use]
    pub fn issuer(&self) -> String {
        format!(
            "{}{}",
            self.provider_url.trim_end_matches('/'),
            auth::ISSUER_PATH
        )
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("provider_url", &self.provider_url)
            .field("jwt_secret", &"[REDACTED]")
            .field("audience", &self.audience)
            .finish()
    }
}

/// CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` allows any origin
    pub allowed_origins: Vec<String>,
}

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Database location
    pub database: DatabaseUrl,
    /// CORS settings
    pub cors: CorsConfig,
    /// Token verification settings
    pub auth: AuthConfig,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `AUTH_PROVIDER_URL` or `AUTH_JWT_SECRET` is unset,
    /// or a numeric setting does not parse
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let provider_url = required_env("AUTH_PROVIDER_URL")?;
        let jwt_secret = required_env("AUTH_JWT_SECRET")?;

        let config = Self {
            http_port: env_var_or("HTTP_PORT", &ports::DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment: Environment::from_str_or_default(&env_var_or(
                "ENVIRONMENT",
                "development",
            )),
            database: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or(
                    "CORS_ALLOWED_ORIGINS",
                    DEFAULT_CORS_ORIGINS,
                )),
            },
            auth: AuthConfig {
                provider_url,
                jwt_secret,
                audience: env_var_or("AUTH_AUDIENCE", auth::DEFAULT_AUDIENCE),
            },
            request_timeout_secs: env_var_or(
                "REQUEST_TIMEOUT_SECS",
                &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
            )
            .parse()
            .context("Invalid REQUEST_TIMEOUT_SECS value")?,
        };

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Season Planner Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - CORS Origins: {}\n\
             - Auth Issuer: {}\n\
             - Auth Audience: {}\n\
             - Request Timeout: {}s",
            self.http_port,
            self.environment,
            if self.database.is_memory() {
                "SQLite (in-memory)"
            } else {
                "SQLite"
            },
            self.cors.allowed_origins.join(", "),
            self.auth.issuer(),
            self.auth.audience,
            self.request_timeout_secs,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get a non-empty environment variable
fn required_env(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{key} must be set"))
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").is_memory());
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/plans.db").to_connection_string(),
            "sqlite:./data/plans.db"
        );
        assert_eq!(
            DatabaseUrl::parse_url("plans.db"),
            DatabaseUrl::SQLite {
                path: PathBuf::from("plans.db")
            }
        );
    }

    #[test]
    fn test_environment_fallback() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    }

    #[test]
    fn test_issuer_trims_trailing_slash() {
        let auth = AuthConfig {
            provider_url: "https://auth.example.com/".to_owned(),
            jwt_secret: "s3cr3t-value".to_owned(),
            audience: "authenticated".to_owned(),
        };
        assert_eq!(auth.issuer(), "https://auth.example.com/auth/v1");
        assert!(!format!("{auth:?}").contains("s3cr3t"));
    }
}
