// ABOUTME: Core data models and typed request records for the Season Planner service
// ABOUTME: Re-exports plans, weeks, sessions, activities, groups, and reference data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! # Data Models
//!
//! The plan hierarchy is Plan → Week → `TrainingSession` → Activity, each level
//! owned by the user who owns the plan. Categories, exercises, and roles are
//! reference data.
//!
//! Every request record states its field constraints once in a `validate()`
//! method, used by the API layer before anything touches the database.

mod activity;
mod catalog;
mod group;
mod plan;
mod role;
mod session;
mod views;
mod week;

/// Shared field validation helpers
pub mod validation;

pub use activity::{
    Activity, ActivityDetails, ActivityFormat, CreateActivityRequest, UpdateActivityRequest,
};
pub use catalog::{Category, CategoryRequest, CategoryWithExercises, Exercise, ExerciseRequest};
pub use group::{CombinedGroup, CombinedGroupRequest};
pub use plan::{CreatePlanRequest, Plan, UpdatePlanRequest};
pub use role::{Role, RoleRequest};
pub use session::{Period, SessionRequest, TrainingSession};
pub use views::{PlanDetails, SessionDetails, WeekDetails};
pub use week::{Week, WeekRequest};
