// ABOUTME: Duration aggregation and analytics rollups for Season Planner
// ABOUTME: Pure functions over activity records that never double count combined groups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

#![deny(unsafe_code)]

//! # Planner Analytics
//!
//! Activities that share a combined group ran at the same time, so the elapsed
//! time of a group is the longest member, not the sum of members. Everything
//! in this crate builds on that rule:
//!
//! - **duration**: real elapsed minutes and the per-category breakdown
//! - **rollup**: session, month, period, and category drilldown views for a plan
//!
//! All functions are total: empty input, zero durations, and missing
//! categories degrade to zero or `"Unknown"` rather than failing.

/// Real-duration and category breakdown over activity records
pub mod duration;

/// Plan-level analytics built on the duration functions
pub mod rollup;

pub use duration::{
    build_category_chart_data, calc_real_duration, category_label, ActivitySample, CategorySlice,
    TimedActivity,
};
pub use rollup::{
    category_drilldown, month_key, monthly_overview, period_breakdown, plan_overview,
    session_summary, CategoryDrilldown, ExerciseSlice, MonthlyCategoryMinutes, MonthlyOverview,
    PeriodSlice, PlanOverview, SessionSummary, Trend,
};
