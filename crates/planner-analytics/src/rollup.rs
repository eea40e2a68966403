// ABOUTME: Plan analytics rollups: session summaries, monthly overview, periods, drilldowns
// ABOUTME: Aggregates sessions and their activities into chart-ready structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Analytics rollups
//!
//! Real (elapsed) minutes come from [`calc_real_duration`]. Category
//! drilldowns report nominal minutes per activity, since a single category is
//! being examined in isolation.

use crate::duration::{
    build_category_chart_data, calc_real_duration, category_label, CategorySlice,
};
use chrono::NaiveDate;
use planner_core::constants::defaults::UNKNOWN_EXERCISE;
use planner_core::models::{ActivityDetails, Period, SessionDetails};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Calendar month key in `YYYY-MM` form
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Summary of one session's activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of activities
    pub activity_count: usize,
    /// Elapsed minutes
    pub real_minutes: f64,
    /// Sum of nominal durations
    pub nominal_minutes: f64,
    /// Elapsed minutes per category
    pub categories: Vec<CategorySlice>,
}

/// Summarize a session's activities
#[must_use]
pub fn session_summary(activities: &[ActivityDetails]) -> SessionSummary {
    SessionSummary {
        activity_count: activities.len(),
        real_minutes: calc_real_duration(activities),
        nominal_minutes: activities
            .iter()
            .map(|a| f64::from(a.activity.duration_minutes))
            .sum(),
        categories: build_category_chart_data(activities),
    }
}

/// Sessions and training days in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOverview {
    /// Month in `YYYY-MM` form
    pub month: String,
    /// Training sessions (rest days excluded)
    pub sessions: usize,
    /// Distinct dates with at least one training session
    pub training_days: usize,
    /// Rest-day sessions
    pub rest_days: usize,
    /// Elapsed minutes across the month's sessions
    pub real_minutes: f64,
}

#[derive(Default)]
struct MonthAccumulator {
    sessions: usize,
    days: BTreeSet<NaiveDate>,
    rest_days: usize,
    minutes: f64,
}

/// One entry per month that has sessions, in chronological order
#[must_use]
pub fn monthly_overview(sessions: &[SessionDetails]) -> Vec<MonthlyOverview> {
    let mut months: BTreeMap<String, MonthAccumulator> = BTreeMap::new();

    for details in sessions {
        let entry = months.entry(month_key(details.session.date)).or_default();
        if details.session.is_rest_day {
            entry.rest_days += 1;
        } else {
            entry.sessions += 1;
            entry.days.insert(details.session.date);
            entry.minutes += calc_real_duration(&details.activities);
        }
    }

    months
        .into_iter()
        .map(|(month, acc)| MonthlyOverview {
            month,
            sessions: acc.sessions,
            training_days: acc.days.len(),
            rest_days: acc.rest_days,
            real_minutes: acc.minutes,
        })
        .collect()
}

/// Number of sessions held in one period of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSlice {
    /// Time of day
    pub period: Period,
    /// Sessions with activities in that period
    pub sessions: usize,
}

/// Count sessions per period, in first-seen order
///
/// Only sessions with a period and at least one activity are counted.
#[must_use]
pub fn period_breakdown(sessions: &[SessionDetails]) -> Vec<PeriodSlice> {
    let mut slices: Vec<PeriodSlice> = Vec::new();

    let counted = sessions
        .iter()
        .filter(|s| !s.activities.is_empty())
        .filter_map(|s| s.session.period);

    for period in counted {
        match slices.iter_mut().find(|slice| slice.period == period) {
            Some(slice) => slice.sessions += 1,
            None => slices.push(PeriodSlice {
                period,
                sessions: 1,
            }),
        }
    }

    slices
}

/// Overview of a plan or of one month within it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOverview {
    /// Training sessions (rest days excluded)
    pub total_sessions: usize,
    /// Distinct dates with at least one training session
    pub training_days: usize,
    /// Elapsed minutes
    pub real_minutes: f64,
    /// Elapsed minutes per category
    pub categories: Vec<CategorySlice>,
    /// Per-month breakdown
    pub months: Vec<MonthlyOverview>,
    /// Sessions per period of the day
    pub periods: Vec<PeriodSlice>,
}

/// Build the overview for a set of sessions
///
/// Combined groups never span sessions, so the activities of every training
/// session are aggregated together.
#[must_use]
pub fn plan_overview(sessions: &[SessionDetails]) -> PlanOverview {
    let training: Vec<&SessionDetails> = sessions.iter().filter(|s| !s.session.is_rest_day).collect();

    let all_activities: Vec<&ActivityDetails> = training
        .iter()
        .flat_map(|s| s.activities.iter())
        .collect();

    let training_days: BTreeSet<NaiveDate> = training.iter().map(|s| s.session.date).collect();

    PlanOverview {
        total_sessions: training.len(),
        training_days: training_days.len(),
        real_minutes: calc_real_duration(&all_activities),
        categories: build_category_chart_data(&all_activities),
        months: monthly_overview(sessions),
        periods: period_breakdown(sessions),
    }
}

/// Direction of a category's monthly minutes over the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// Second half of the months averages more minutes than the first
    Increasing,
    /// Second half averages fewer minutes
    Decreasing,
    /// Equal averages, or fewer than two months of data
    Stable,
}

impl Trend {
    /// Compare the mean of the first `ceil(n/2)` values with the mean of the rest
    #[must_use]
    pub fn from_series(values: &[f64]) -> Self {
        if values.len() < 2 {
            return Self::Stable;
        }
        let split = values.len().div_ceil(2);
        let (first, second) = values.split_at(split);
        let mean = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;

        let (a, b) = (mean(first), mean(second));
        if b > a {
            Self::Increasing
        } else if b < a {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

/// Nominal minutes spent on one exercise within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSlice {
    /// Exercise name
    pub name: String,
    /// Sum of nominal durations
    pub minutes: f64,
    /// Number of activities
    pub activities: usize,
}

/// Nominal minutes for one category in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCategoryMinutes {
    /// Month in `YYYY-MM` form
    pub month: String,
    /// Sum of nominal durations
    pub minutes: f64,
    /// Number of activities
    pub activities: usize,
    /// Sessions containing at least one such activity
    pub sessions: usize,
}

/// Detailed view of one category across a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDrilldown {
    /// Category name
    pub category: String,
    /// Sum of nominal durations
    pub total_minutes: f64,
    /// Number of activities
    pub activity_count: usize,
    /// Exercises by minutes, largest first
    pub exercises: Vec<ExerciseSlice>,
    /// Chronological monthly distribution
    pub months: Vec<MonthlyCategoryMinutes>,
    /// Direction of the monthly distribution
    pub trend: Trend,
}

#[derive(Default)]
struct MonthCategoryAccumulator {
    minutes: f64,
    activities: usize,
    sessions: BTreeSet<i64>,
}

/// Break one category down by exercise and by month
///
/// Activities without a category match the "Unknown" chart label.
#[must_use]
pub fn category_drilldown(category: &str, sessions: &[SessionDetails]) -> CategoryDrilldown {
    let mut exercises: HashMap<String, ExerciseSlice> = HashMap::new();
    let mut months: BTreeMap<String, MonthCategoryAccumulator> = BTreeMap::new();
    let mut total_minutes = 0.0;
    let mut activity_count = 0;

    for details in sessions {
        let matching = details
            .activities
            .iter()
            .filter(|a| category_label(a.category_name.as_deref()) == category);

        for activity in matching {
            let minutes = f64::from(activity.activity.duration_minutes);
            total_minutes += minutes;
            activity_count += 1;

            let name = activity
                .exercise_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_EXERCISE.to_owned());
            let slice = exercises
                .entry(name.clone())
                .or_insert_with(|| ExerciseSlice {
                    name,
                    minutes: 0.0,
                    activities: 0,
                });
            slice.minutes += minutes;
            slice.activities += 1;

            let month = months.entry(month_key(details.session.date)).or_default();
            month.minutes += minutes;
            month.activities += 1;
            month.sessions.insert(details.session.id);
        }
    }

    let mut exercises: Vec<ExerciseSlice> = exercises.into_values().collect();
    exercises.sort_by(|a, b| {
        b.minutes
            .total_cmp(&a.minutes)
            .then_with(|| a.name.cmp(&b.name))
    });

    let months: Vec<MonthlyCategoryMinutes> = months
        .into_iter()
        .map(|(month, acc)| MonthlyCategoryMinutes {
            month,
            minutes: acc.minutes,
            activities: acc.activities,
            sessions: acc.sessions.len(),
        })
        .collect();

    let series: Vec<f64> = months.iter().map(|m| m.minutes).collect();

    CategoryDrilldown {
        category: category.to_owned(),
        total_minutes,
        activity_count,
        exercises,
        trend: Trend::from_series(&series),
        months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use planner_core::models::{Activity, ActivityFormat, TrainingSession};
    use uuid::Uuid;

    fn activity(
        id: i64,
        minutes: u32,
        category: Option<&str>,
        exercise: Option<&str>,
        group: Option<Uuid>,
    ) -> ActivityDetails {
        ActivityDetails {
            activity: Activity {
                id,
                session_id: 1,
                user_id: Uuid::nil(),
                duration_minutes: minutes,
                format: ActivityFormat::Drill,
                category_id: None,
                exercise_id: None,
                variation: None,
                combined_group_id: group,
            },
            category_name: category.map(str::to_owned),
            exercise_name: exercise.map(str::to_owned),
        }
    }

    fn session(
        id: i64,
        date: &str,
        period: Option<Period>,
        is_rest_day: bool,
        activities: Vec<ActivityDetails>,
    ) -> SessionDetails {
        SessionDetails {
            session: TrainingSession {
                id,
                week_id: 1,
                user_id: Uuid::nil(),
                date: date.parse().unwrap(),
                period,
                is_rest_day,
                notes: None,
                created_at: Utc::now(),
            },
            total_minutes: calc_real_duration(&activities),
            activities,
        }
    }

    #[test]
    fn test_session_summary_reports_real_and_nominal() {
        let group = Uuid::new_v4();
        let activities = vec![
            activity(1, 30, Some("Technical"), None, Some(group)),
            activity(2, 30, Some("Physical"), None, Some(group)),
            activity(3, 10, Some("Tactical"), None, None),
        ];
        let summary = session_summary(&activities);
        assert_eq!(summary.activity_count, 3);
        assert!((summary.real_minutes - 40.0).abs() < f64::EPSILON);
        assert!((summary.nominal_minutes - 70.0).abs() < f64::EPSILON);
        assert_eq!(summary.categories.len(), 3);
    }

    #[test]
    fn test_monthly_overview_is_chronological() {
        let sessions = vec![
            session(1, "2025-10-02", None, false, vec![activity(1, 60, None, None, None)]),
            session(2, "2025-09-03", None, false, vec![activity(2, 45, None, None, None)]),
            session(3, "2025-09-03", Some(Period::Evening), false, vec![]),
            session(4, "2025-09-07", None, true, vec![]),
        ];
        let months = monthly_overview(&sessions);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2025-09");
        assert_eq!(months[0].sessions, 2);
        assert_eq!(months[0].training_days, 1);
        assert_eq!(months[0].rest_days, 1);
        assert!((months[0].real_minutes - 45.0).abs() < f64::EPSILON);
        assert_eq!(months[1].month, "2025-10");
    }

    #[test]
    fn test_period_breakdown_skips_empty_and_unlabelled_sessions() {
        let sessions = vec![
            session(1, "2025-09-01", Some(Period::Evening), false, vec![activity(1, 30, None, None, None)]),
            session(2, "2025-09-02", Some(Period::Morning), false, vec![activity(2, 30, None, None, None)]),
            session(3, "2025-09-03", Some(Period::Evening), false, vec![activity(3, 30, None, None, None)]),
            session(4, "2025-09-04", Some(Period::Afternoon), false, vec![]),
            session(5, "2025-09-05", None, false, vec![activity(4, 30, None, None, None)]),
        ];
        let periods = period_breakdown(&sessions);
        assert_eq!(
            periods,
            vec![
                PeriodSlice { period: Period::Evening, sessions: 2 },
                PeriodSlice { period: Period::Morning, sessions: 1 },
            ]
        );
    }

    #[test]
    fn test_plan_overview_counts_groups_once() {
        let group = Uuid::new_v4();
        let sessions = vec![
            session(
                1,
                "2025-09-01",
                Some(Period::Morning),
                false,
                vec![
                    activity(1, 20, Some("Technical"), None, Some(group)),
                    activity(2, 40, Some("Physical"), None, Some(group)),
                ],
            ),
            session(2, "2025-09-02", None, false, vec![activity(3, 25, Some("Tactical"), None, None)]),
            session(3, "2025-09-07", None, true, vec![]),
        ];
        let overview = plan_overview(&sessions);
        assert_eq!(overview.total_sessions, 2);
        assert_eq!(overview.training_days, 2);
        assert!((overview.real_minutes - 65.0).abs() < f64::EPSILON);
        let total: i64 = overview.categories.iter().map(|c| c.value).sum();
        assert!((total - 65).abs() <= 2);
    }

    #[test]
    fn test_trend_from_series() {
        assert_eq!(Trend::from_series(&[]), Trend::Stable);
        assert_eq!(Trend::from_series(&[120.0]), Trend::Stable);
        assert_eq!(Trend::from_series(&[60.0, 90.0]), Trend::Increasing);
        // First half is the first two of three months
        assert_eq!(Trend::from_series(&[100.0, 20.0, 60.0]), Trend::Stable);
        assert_eq!(Trend::from_series(&[100.0, 80.0, 40.0, 20.0]), Trend::Decreasing);
    }

    #[test]
    fn test_category_drilldown() {
        let sessions = vec![
            session(
                1,
                "2025-09-01",
                None,
                false,
                vec![
                    activity(1, 30, Some("Technical"), Some("Rondo"), None),
                    activity(2, 20, Some("Physical"), Some("Sprints"), None),
                ],
            ),
            session(
                2,
                "2025-10-06",
                None,
                false,
                vec![
                    activity(3, 45, Some("Technical"), Some("Passing"), None),
                    activity(4, 20, Some("Technical"), Some("Rondo"), None),
                    activity(5, 10, Some("Technical"), None, None),
                ],
            ),
        ];

        let drill = category_drilldown("Technical", &sessions);
        assert_eq!(drill.activity_count, 4);
        assert!((drill.total_minutes - 105.0).abs() < f64::EPSILON);

        let names: Vec<_> = drill.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Rondo", "Passing", "Unknown"]);
        assert_eq!(drill.exercises[0].activities, 2);

        assert_eq!(drill.months.len(), 2);
        assert_eq!(drill.months[0].month, "2025-09");
        assert_eq!(drill.months[1].sessions, 1);
        assert_eq!(drill.months[1].activities, 3);
        assert_eq!(drill.trend, Trend::Increasing);
    }

    #[test]
    fn test_category_drilldown_matches_unknown_chart_slice() {
        let sessions = vec![session(
            1,
            "2025-09-01",
            None,
            false,
            vec![
                activity(1, 30, None, Some("Rondo"), None),
                activity(2, 15, Some("Technical"), None, None),
            ],
        )];

        let overview = plan_overview(&sessions);
        let unknown = overview
            .categories
            .iter()
            .find(|slice| slice.name == "Unknown")
            .unwrap();
        assert_eq!(unknown.value, 30);

        let drill = category_drilldown("Unknown", &sessions);
        assert_eq!(drill.activity_count, 1);
        assert!((drill.total_minutes - 30.0).abs() < f64::EPSILON);
        assert_eq!(drill.exercises[0].name, "Rondo");
    }

    #[test]
    fn test_drilldown_of_unused_category_is_empty() {
        let sessions = vec![session(1, "2025-09-01", None, false, vec![activity(1, 30, Some("Physical"), None, None)])];
        let drill = category_drilldown("Tactical", &sessions);
        assert_eq!(drill.activity_count, 0);
        assert!(drill.exercises.is_empty());
        assert!(drill.months.is_empty());
        assert_eq!(drill.trend, Trend::Stable);
    }
}
