// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, test configuration, tokens, and seeded plan fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `season_planner`

use anyhow::Result;
use chrono::NaiveDate;
use planner_core::models::{CreatePlanRequest, Plan, SessionRequest, TrainingSession, Week};
use season_planner::{
    config::{AuthConfig, CorsConfig, DatabaseUrl, Environment, ServerConfig},
    database::Database,
    resources::ServerResources,
};
use std::sync::{Arc, Once};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Shared secret used by every test token
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-season-planner";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(Arc::new(database))
}

/// Configuration for in-process servers
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        database: DatabaseUrl::Memory,
        cors: CorsConfig {
            allowed_origins: vec!["*".to_owned()],
        },
        auth: AuthConfig {
            provider_url: "https://project.auth.test".to_owned(),
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            audience: "authenticated".to_owned(),
        },
        request_timeout_secs: 30,
    }
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    Ok(Arc::new(ServerResources::new(database, test_config())))
}

/// Bearer header value for `user_id`
pub fn bearer(resources: &ServerResources, user_id: Uuid) -> String {
    let token = resources
        .auth_manager
        .generate_token(user_id, Some("coach@example.com"))
        .unwrap();
    format!("Bearer {token}")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Four-week plan starting Monday 2025-09-01
pub async fn create_short_plan(database: &Database, user_id: Uuid) -> (Plan, Vec<Week>) {
    let request = CreatePlanRequest {
        team_name: "U17 Girls".to_owned(),
        coach_name: "Sam Rivera".to_owned(),
        start_date: date(2025, 9, 1),
        duration_weeks: Some(4),
    };
    database
        .plans()
        .create_with_weeks(user_id, &request)
        .await
        .unwrap()
}

/// Training session on `day` inside `week`
pub async fn create_session(
    database: &Database,
    user_id: Uuid,
    week: &Week,
    day: NaiveDate,
) -> TrainingSession {
    let request = SessionRequest {
        date: day,
        period: None,
        is_rest_day: false,
        notes: None,
    };
    database
        .sessions()
        .create(week.id, user_id, &request)
        .await
        .unwrap()
}
