// ABOUTME: Integration tests for plan, week, and session storage
// ABOUTME: Covers week generation, ownership checks, cascades, and session date rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use chrono::{Datelike, Weekday};
use common::{create_session, create_short_plan, create_test_database, date};
use planner_core::constants::reference::STANDARD_CATEGORIES;
use planner_core::models::{CreatePlanRequest, SessionRequest, UpdatePlanRequest, WeekRequest};
use season_planner::errors::ErrorCode;
use uuid::Uuid;

// ===== Plans =====

#[tokio::test]
async fn test_create_plan_generates_season_of_monday_weeks() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();

    let request = CreatePlanRequest {
        team_name: "First Team".to_owned(),
        coach_name: "Alex Morgan".to_owned(),
        // Wednesday
        start_date: date(2025, 8, 6),
        duration_weeks: None,
    };
    let (plan, weeks) = database
        .plans()
        .create_with_weeks(user, &request)
        .await
        .unwrap();

    assert_eq!(plan.year, 2025);
    assert_eq!(plan.user_id, user);
    assert_eq!(weeks.len(), 52);
    assert_eq!(weeks[0].start_date, date(2025, 8, 4));
    for (i, week) in weeks.iter().enumerate() {
        assert_eq!(week.week_number as usize, i + 1);
        assert_eq!(week.start_date.weekday(), Weekday::Mon);
        assert_eq!(week.end_date.weekday(), Weekday::Sun);
        assert_eq!(week.plan_id, plan.id);
    }

    let stored = database.weeks().list_for_plan(plan.id, user).await.unwrap();
    assert_eq!(stored.len(), 52);
}

#[tokio::test]
async fn test_create_plan_rejects_blank_team() {
    let database = create_test_database().await.unwrap();
    let request = CreatePlanRequest {
        team_name: "   ".to_owned(),
        coach_name: "Coach".to_owned(),
        start_date: date(2025, 9, 1),
        duration_weeks: Some(4),
    };

    let error = database
        .plans()
        .create_with_weeks(Uuid::new_v4(), &request)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::MissingRequiredField);
}

#[tokio::test]
async fn test_plan_ownership_is_enforced() {
    let database = create_test_database().await.unwrap();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let (plan, _) = create_short_plan(&database, owner).await;

    let error = database.plans().get(plan.id, stranger).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    let error = database.plans().get(plan.id + 1000, owner).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    let error = database.plans().delete(plan.id, stranger).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
    assert!(database.plans().get(plan.id, owner).await.is_ok());
}

#[tokio::test]
async fn test_list_plans_only_returns_own() {
    let database = create_test_database().await.unwrap();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    create_short_plan(&database, first).await;
    create_short_plan(&database, first).await;
    create_short_plan(&database, second).await;

    assert_eq!(database.plans().list(first).await.unwrap().len(), 2);
    assert_eq!(database.plans().list(second).await.unwrap().len(), 1);
    assert!(database.plans().list(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_plan_replaces_fields() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (plan, _) = create_short_plan(&database, user).await;

    let request = UpdatePlanRequest {
        year: 2026,
        team_name: "U18 Girls".to_owned(),
        coach_name: "Sam Rivera".to_owned(),
    };
    let updated = database.plans().update(plan.id, user, &request).await.unwrap();
    assert_eq!(updated.team_name, "U18 Girls");
    assert_eq!(updated.year, 2026);
    assert_eq!(updated.start_date, plan.start_date);
}

#[tokio::test]
async fn test_delete_plan_cascades_to_weeks_and_sessions() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (plan, weeks) = create_short_plan(&database, user).await;
    let session = create_session(&database, user, &weeks[0], date(2025, 9, 2)).await;

    database.plans().delete(plan.id, user).await.unwrap();

    let error = database.weeks().get(weeks[0].id, user).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    let error = database.sessions().get(session.id, user).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

// ===== Weeks =====

#[tokio::test]
async fn test_duplicate_week_number_conflicts() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (plan, _) = create_short_plan(&database, user).await;

    let request = WeekRequest {
        week_number: 2,
        start_date: date(2025, 9, 29),
        end_date: date(2025, 10, 5),
    };
    let error = database
        .weeks()
        .create(plan.id, user, &request)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceAlreadyExists);

    let request = WeekRequest {
        week_number: 5,
        start_date: date(2025, 9, 29),
        end_date: date(2025, 10, 5),
    };
    let week = database.weeks().create(plan.id, user, &request).await.unwrap();
    assert_eq!(week.week_number, 5);
}

#[tokio::test]
async fn test_week_dates_must_run_monday_to_sunday() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (plan, weeks) = create_short_plan(&database, user).await;

    let midweek = WeekRequest {
        week_number: 9,
        start_date: date(2025, 9, 10),
        end_date: date(2025, 9, 12),
    };
    let error = database
        .weeks()
        .create(plan.id, user, &midweek)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let stretched = WeekRequest {
        week_number: 1,
        start_date: date(2025, 10, 8),
        end_date: date(2026, 1, 8),
    };
    let error = database
        .weeks()
        .update(weeks[0].id, user, &stretched)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let unchanged = database.weeks().get(weeks[0].id, user).await.unwrap();
    assert_eq!(unchanged.start_date, date(2025, 9, 1));
}

#[tokio::test]
async fn test_overlapping_weeks_conflict() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (plan, weeks) = create_short_plan(&database, user).await;

    let clash = WeekRequest {
        week_number: 9,
        start_date: date(2025, 9, 8),
        end_date: date(2025, 9, 14),
    };
    let error = database
        .weeks()
        .create(plan.id, user, &clash)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceConflict);
    assert_eq!(error.context.details["week_id"], weeks[1].id);

    let onto_sibling = WeekRequest {
        week_number: 1,
        start_date: date(2025, 9, 15),
        end_date: date(2025, 9, 21),
    };
    let error = database
        .weeks()
        .update(weeks[0].id, user, &onto_sibling)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceConflict);

    // Another plan may use the same dates
    let (other_plan, _) = create_short_plan(&database, user).await;
    let extra = WeekRequest {
        week_number: 5,
        start_date: date(2025, 9, 29),
        end_date: date(2025, 10, 5),
    };
    database.weeks().create(plan.id, user, &extra).await.unwrap();
    database
        .weeks()
        .create(other_plan.id, user, &extra)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_moving_week_keeps_sessions_inside() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (_, weeks) = create_short_plan(&database, user).await;
    let session = create_session(&database, user, &weeks[0], date(2025, 9, 3)).await;

    let moved = WeekRequest {
        week_number: 1,
        start_date: date(2025, 10, 6),
        end_date: date(2025, 10, 12),
    };
    let error = database
        .weeks()
        .update(weeks[0].id, user, &moved)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    // The session still fits its week and saves unchanged
    let resave = SessionRequest {
        date: session.date,
        period: None,
        is_rest_day: false,
        notes: None,
    };
    database
        .sessions()
        .update(session.id, user, &resave)
        .await
        .unwrap();

    // A week without sessions can move to a free slot
    let moved_last = WeekRequest {
        week_number: 4,
        ..moved
    };
    let week = database
        .weeks()
        .update(weeks[3].id, user, &moved_last)
        .await
        .unwrap();
    assert_eq!(week.start_date, date(2025, 10, 6));

    // Renumbering without moving skips the date checks
    let renumbered = WeekRequest {
        week_number: 7,
        start_date: weeks[0].start_date,
        end_date: weeks[0].end_date,
    };
    let week = database
        .weeks()
        .update(weeks[0].id, user, &renumbered)
        .await
        .unwrap();
    assert_eq!(week.week_number, 7);
}

#[tokio::test]
async fn test_week_in_foreign_plan_is_forbidden() {
    let database = create_test_database().await.unwrap();
    let owner = Uuid::new_v4();
    let (plan, weeks) = create_short_plan(&database, owner).await;
    let stranger = Uuid::new_v4();

    let error = database
        .weeks()
        .list_for_plan(plan.id, stranger)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    let error = database.weeks().get(weeks[1].id, stranger).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
}

// ===== Sessions =====

#[tokio::test]
async fn test_session_date_must_fall_inside_week() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (_, weeks) = create_short_plan(&database, user).await;

    let request = SessionRequest {
        date: date(2025, 9, 9),
        period: None,
        is_rest_day: false,
        notes: None,
    };
    let error = database
        .sessions()
        .create(weeks[0].id, user, &request)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.context.details["field"], "date");

    let session = database
        .sessions()
        .create(weeks[1].id, user, &request)
        .await
        .unwrap();
    assert_eq!(session.week_id, weeks[1].id);
}

#[tokio::test]
async fn test_sessions_listed_in_date_order() {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (_, weeks) = create_short_plan(&database, user).await;

    create_session(&database, user, &weeks[0], date(2025, 9, 5)).await;
    create_session(&database, user, &weeks[0], date(2025, 9, 1)).await;
    create_session(&database, user, &weeks[0], date(2025, 9, 3)).await;

    let sessions = database
        .sessions()
        .list_for_week(weeks[0].id, user)
        .await
        .unwrap();
    let dates: Vec<_> = sessions.iter().map(|s| s.date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 9, 1), date(2025, 9, 3), date(2025, 9, 5)]
    );
}

#[tokio::test]
async fn test_delete_missing_session_is_not_found() {
    let database = create_test_database().await.unwrap();
    let error = database
        .sessions()
        .delete(4242, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

// ===== File-backed storage =====

#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", temp_dir.path().join("plans.db").display());
    let user = Uuid::new_v4();

    let plan_id = {
        let database = season_planner::database::Database::new(&url).await.unwrap();
        let (plan, _) = create_short_plan(&database, user).await;
        plan.id
    };

    // Reopening runs migrations again without duplicating seed data
    let database = season_planner::database::Database::new(&url).await.unwrap();
    let plan = database.plans().get(plan_id, user).await.unwrap();
    assert_eq!(plan.id, plan_id);

    let categories = database.categories().list(user).await.unwrap();
    assert_eq!(categories.len(), STANDARD_CATEGORIES.len());
}
