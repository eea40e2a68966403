// ABOUTME: Integration tests for the catalog, activities, and combined groups
// ABOUTME: Covers variation rules, rest days, group membership, and real-duration totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{create_session, create_short_plan, create_test_database, date};
use planner_analytics::session_summary;
use planner_core::models::{
    ActivityDetails, ActivityFormat, CategoryRequest, CombinedGroupRequest, CreateActivityRequest,
    Exercise, ExerciseRequest, SessionRequest, TrainingSession,
};
use season_planner::database::Database;
use season_planner::errors::ErrorCode;
use std::sync::Arc;
use uuid::Uuid;

struct Fixture {
    database: Arc<Database>,
    user: Uuid,
    session: TrainingSession,
    category_id: i64,
    rondo: Exercise,
    sprints: Exercise,
}

async fn fixture() -> Fixture {
    let database = create_test_database().await.unwrap();
    let user = Uuid::new_v4();
    let (_, weeks) = create_short_plan(&database, user).await;
    let session = create_session(&database, user, &weeks[0], date(2025, 9, 2)).await;

    let category = database
        .categories()
        .create(
            user,
            &CategoryRequest {
                name: "Possession".to_owned(),
            },
        )
        .await
        .unwrap();
    let rondo = database
        .exercises()
        .create(
            category.id,
            user,
            &ExerciseRequest {
                name: "Rondo".to_owned(),
                description: Some("Keep-away in a grid".to_owned()),
                variations: vec!["3v1".to_owned(), "4v2".to_owned()],
                combinations: None,
            },
        )
        .await
        .unwrap();
    let sprints = database
        .exercises()
        .create(
            category.id,
            user,
            &ExerciseRequest {
                name: "Sprints".to_owned(),
                description: None,
                variations: Vec::new(),
                combinations: None,
            },
        )
        .await
        .unwrap();

    Fixture {
        database,
        user,
        session,
        category_id: category.id,
        rondo,
        sprints,
    }
}

fn sprint_request(fx: &Fixture, minutes: u32, combine_with: Vec<i64>) -> CreateActivityRequest {
    CreateActivityRequest {
        duration_minutes: minutes,
        format: ActivityFormat::Drill,
        category_id: fx.category_id,
        exercise_id: fx.sprints.id,
        variation: None,
        combine_with,
    }
}

async fn add(fx: &Fixture, minutes: u32, combine_with: Vec<i64>) -> ActivityDetails {
    fx.database
        .activities()
        .create(fx.session.id, fx.user, &sprint_request(fx, minutes, combine_with))
        .await
        .unwrap()
}

// ===== Catalog =====

#[tokio::test]
async fn test_standard_categories_are_shared_and_read_only() {
    let fx = fixture().await;
    let other = Uuid::new_v4();

    let names: Vec<String> = fx
        .database
        .categories()
        .list(other)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Physical", "Tactical", "Technical"]);

    let technical = fx
        .database
        .categories()
        .list(fx.user)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Technical")
        .unwrap();
    let error = fx
        .database
        .categories()
        .update(
            technical.id,
            fx.user,
            &CategoryRequest {
                name: "Skills".to_owned(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_custom_category_is_private() {
    let fx = fixture().await;
    let other = Uuid::new_v4();

    let listed = fx.database.categories().list(other).await.unwrap();
    assert!(listed.iter().all(|c| c.id != fx.category_id));

    let error = fx
        .database
        .categories()
        .get(fx.category_id, other)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);

    let error = fx
        .database
        .exercises()
        .get(fx.rondo.id, other)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_categories_with_exercises_nests_variations() {
    let fx = fixture().await;

    let nested = fx
        .database
        .categories()
        .list_with_exercises(fx.user)
        .await
        .unwrap();
    let possession = nested
        .iter()
        .find(|c| c.category.id == fx.category_id)
        .unwrap();
    let names: Vec<&str> = possession.exercises.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Rondo", "Sprints"]);
    assert_eq!(possession.exercises[0].variations, vec!["3v1", "4v2"]);
}

// ===== Activities =====

#[tokio::test]
async fn test_variation_is_required_and_checked() {
    let fx = fixture().await;
    let mut request = CreateActivityRequest {
        duration_minutes: 20,
        format: ActivityFormat::Drill,
        category_id: fx.category_id,
        exercise_id: fx.rondo.id,
        variation: None,
        combine_with: Vec::new(),
    };

    let error = fx
        .database
        .activities()
        .create(fx.session.id, fx.user, &request)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::MissingRequiredField);

    request.variation = Some("5v3".to_owned());
    let error = fx
        .database
        .activities()
        .create(fx.session.id, fx.user, &request)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.context.details["field"], "variation");

    request.variation = Some("4v2".to_owned());
    let created = fx
        .database
        .activities()
        .create(fx.session.id, fx.user, &request)
        .await
        .unwrap();
    assert_eq!(created.activity.variation.as_deref(), Some("4v2"));
    assert_eq!(created.category_name.as_deref(), Some("Possession"));
    assert_eq!(created.exercise_name.as_deref(), Some("Rondo"));
}

#[tokio::test]
async fn test_exercise_must_belong_to_chosen_category() {
    let fx = fixture().await;
    let physical = fx
        .database
        .categories()
        .list(fx.user)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Physical")
        .unwrap();

    let mut request = sprint_request(&fx, 15, Vec::new());
    request.category_id = physical.id;
    let error = fx
        .database
        .activities()
        .create(fx.session.id, fx.user, &request)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.context.details["field"], "exercise_id");
}

#[tokio::test]
async fn test_duration_outside_bounds_is_rejected() {
    let fx = fixture().await;
    for minutes in [0, 601] {
        let error = fx
            .database
            .activities()
            .create(fx.session.id, fx.user, &sprint_request(&fx, minutes, Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(error.http_status(), 400, "{minutes} minutes");
    }
}

#[tokio::test]
async fn test_rest_day_and_activities_are_exclusive() {
    let fx = fixture().await;
    let (_, weeks) = create_short_plan(&fx.database, fx.user).await;
    let rest_day = fx
        .database
        .sessions()
        .create(
            weeks[0].id,
            fx.user,
            &SessionRequest {
                date: date(2025, 9, 7),
                period: None,
                is_rest_day: true,
                notes: Some("Recovery".to_owned()),
            },
        )
        .await
        .unwrap();

    let error = fx
        .database
        .activities()
        .create(rest_day.id, fx.user, &sprint_request(&fx, 10, Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    add(&fx, 10, Vec::new()).await;
    let error = fx
        .database
        .sessions()
        .update(
            fx.session.id,
            fx.user,
            &SessionRequest {
                date: fx.session.date,
                period: None,
                is_rest_day: true,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.context.details["field"], "is_rest_day");
}

#[tokio::test]
async fn test_activity_of_other_user_is_forbidden() {
    let fx = fixture().await;
    let activity = add(&fx, 10, Vec::new()).await;

    let error = fx
        .database
        .activities()
        .get(activity.activity.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_deleted_category_leaves_unknown_activity() {
    let fx = fixture().await;
    let activity = add(&fx, 25, Vec::new()).await;

    fx.database
        .categories()
        .delete(fx.category_id, fx.user)
        .await
        .unwrap();

    let orphan = fx
        .database
        .activities()
        .get(activity.activity.id, fx.user)
        .await
        .unwrap();
    assert_eq!(orphan.activity.duration_minutes, 25);
    assert!(orphan.activity.category_id.is_none());
    assert!(orphan.category_name.is_none());

    let summary = session_summary(&[orphan]);
    assert_eq!(summary.categories.len(), 1);
    assert_eq!(summary.categories[0].name, "Unknown");
    assert_eq!(summary.categories[0].value, 25);
}

// ===== Combined groups =====

#[tokio::test]
async fn test_combine_with_counts_parallel_time_once() {
    let fx = fixture().await;
    let first = add(&fx, 30, Vec::new()).await;
    let second = add(&fx, 20, vec![first.activity.id]).await;
    add(&fx, 15, Vec::new()).await;

    let group_id = second.activity.combined_group_id.unwrap();
    let group = fx
        .database
        .combined_groups()
        .get(group_id, fx.user)
        .await
        .unwrap();
    assert_eq!(group.member_ids, vec![first.activity.id, second.activity.id]);

    let details = fx
        .database
        .hierarchy()
        .session_details(fx.session.id, fx.user)
        .await
        .unwrap();
    assert_eq!(details.activities.len(), 3);
    assert!((details.total_minutes - 45.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_combine_with_joins_existing_group() {
    let fx = fixture().await;
    let first = add(&fx, 30, Vec::new()).await;
    let second = add(&fx, 20, vec![first.activity.id]).await;
    let third = add(&fx, 40, vec![second.activity.id]).await;

    let group_id = second.activity.combined_group_id.unwrap();
    assert_eq!(third.activity.combined_group_id, Some(group_id));

    let groups = fx
        .database
        .combined_groups()
        .list_for_session(fx.session.id, fx.user)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].member_ids.len(), 3);
}

#[tokio::test]
async fn test_deleting_member_of_pair_dissolves_group() {
    let fx = fixture().await;
    let first = add(&fx, 30, Vec::new()).await;
    let second = add(&fx, 20, vec![first.activity.id]).await;
    let group_id = second.activity.combined_group_id.unwrap();

    fx.database
        .activities()
        .delete(second.activity.id, fx.user)
        .await
        .unwrap();

    let error = fx
        .database
        .combined_groups()
        .get(group_id, fx.user)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    let survivor = fx
        .database
        .activities()
        .get(first.activity.id, fx.user)
        .await
        .unwrap();
    assert!(survivor.activity.combined_group_id.is_none());
}

#[tokio::test]
async fn test_moving_member_dissolves_old_pair() {
    let fx = fixture().await;
    let a = add(&fx, 10, Vec::new()).await;
    let b = add(&fx, 10, vec![a.activity.id]).await;
    let c = add(&fx, 10, Vec::new()).await;
    let old_group = b.activity.combined_group_id.unwrap();

    let new_group = fx
        .database
        .combined_groups()
        .create(
            fx.session.id,
            fx.user,
            &CombinedGroupRequest {
                activity_ids: vec![b.activity.id, c.activity.id],
            },
        )
        .await
        .unwrap();
    assert_eq!(new_group.member_ids, vec![b.activity.id, c.activity.id]);

    let error = fx
        .database
        .combined_groups()
        .get(old_group, fx.user)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_group_needs_two_members_from_same_session() {
    let fx = fixture().await;
    let a = add(&fx, 10, Vec::new()).await;

    let error = fx
        .database
        .combined_groups()
        .create(
            fx.session.id,
            fx.user,
            &CombinedGroupRequest {
                activity_ids: vec![a.activity.id, a.activity.id],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);

    let (_, weeks) = create_short_plan(&fx.database, fx.user).await;
    let elsewhere = create_session(&fx.database, fx.user, &weeks[1], date(2025, 9, 9)).await;
    let far = fx
        .database
        .activities()
        .create(elsewhere.id, fx.user, &sprint_request(&fx, 10, Vec::new()))
        .await
        .unwrap();

    let error = fx
        .database
        .combined_groups()
        .create(
            fx.session.id,
            fx.user,
            &CombinedGroupRequest {
                activity_ids: vec![a.activity.id, far.activity.id],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_deleting_group_frees_members() {
    let fx = fixture().await;
    let a = add(&fx, 30, Vec::new()).await;
    let b = add(&fx, 20, vec![a.activity.id]).await;
    let group_id = b.activity.combined_group_id.unwrap();

    fx.database
        .combined_groups()
        .delete(group_id, fx.user)
        .await
        .unwrap();

    let details = fx
        .database
        .hierarchy()
        .session_details(fx.session.id, fx.user)
        .await
        .unwrap();
    assert!(details
        .activities
        .iter()
        .all(|a| a.activity.combined_group_id.is_none()));
    assert!((details.total_minutes - 50.0).abs() < f64::EPSILON);
}
