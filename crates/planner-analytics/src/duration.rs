// ABOUTME: Real elapsed duration and category breakdown for a set of activities
// ABOUTME: Combined groups count once at their longest member's duration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

use planner_core::constants::defaults::UNKNOWN_CATEGORY;
use planner_core::models::ActivityDetails;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Anything with a duration, an optional combined group, and an optional category
pub trait TimedActivity {
    /// Nominal duration in minutes; `None` counts as zero
    fn duration_minutes(&self) -> Option<f64>;

    /// Group shared with simultaneous activities; `None` for standalone
    fn combined_group_id(&self) -> Option<Uuid>;

    /// Category name; `None` is reported as `"Unknown"`
    fn category_name(&self) -> Option<&str>;
}

impl<T: TimedActivity + ?Sized> TimedActivity for &T {
    fn duration_minutes(&self) -> Option<f64> {
        (**self).duration_minutes()
    }

    fn combined_group_id(&self) -> Option<Uuid> {
        (**self).combined_group_id()
    }

    fn category_name(&self) -> Option<&str> {
        (**self).category_name()
    }
}

impl TimedActivity for ActivityDetails {
    fn duration_minutes(&self) -> Option<f64> {
        Some(f64::from(self.activity.duration_minutes))
    }

    fn combined_group_id(&self) -> Option<Uuid> {
        self.activity.combined_group_id
    }

    fn category_name(&self) -> Option<&str> {
        self.category_name.as_deref()
    }
}

/// Free-standing activity record for callers without stored activities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySample {
    /// Nominal duration in minutes
    pub duration_minutes: Option<f64>,
    /// Group shared with simultaneous activities
    pub combined_group_id: Option<Uuid>,
    /// Category name
    pub category: Option<String>,
}

impl ActivitySample {
    /// Activity that ran on its own
    #[must_use]
    pub fn standalone(duration_minutes: f64, category: &str) -> Self {
        Self {
            duration_minutes: Some(duration_minutes),
            combined_group_id: None,
            category: Some(category.to_owned()),
        }
    }

    /// Activity that ran alongside the other members of `group`
    #[must_use]
    pub fn grouped(duration_minutes: f64, group: Uuid, category: &str) -> Self {
        Self {
            duration_minutes: Some(duration_minutes),
            combined_group_id: Some(group),
            category: Some(category.to_owned()),
        }
    }
}

impl TimedActivity for ActivitySample {
    fn duration_minutes(&self) -> Option<f64> {
        self.duration_minutes
    }

    fn combined_group_id(&self) -> Option<Uuid> {
        self.combined_group_id
    }

    fn category_name(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Minutes credited to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySlice {
    /// Category name
    pub name: String,
    /// Rounded minutes
    pub value: i64,
}

/// Duration with missing, negative, and non-finite values treated as zero
fn minutes_of<A: TimedActivity>(activity: &A) -> f64 {
    activity
        .duration_minutes()
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(0.0)
}

/// Activities split into standalone ones and groups in first-seen order
struct Partition<'a, A> {
    standalone: Vec<&'a A>,
    groups: Vec<Vec<&'a A>>,
}

fn partition<A: TimedActivity>(activities: &[A]) -> Partition<'_, A> {
    let mut standalone = Vec::new();
    let mut groups: Vec<Vec<&A>> = Vec::new();
    let mut group_index: HashMap<Uuid, usize> = HashMap::new();

    for activity in activities {
        match activity.combined_group_id() {
            None => standalone.push(activity),
            Some(group_id) => {
                let index = *group_index.entry(group_id).or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
                groups[index].push(activity);
            }
        }
    }

    Partition { standalone, groups }
}

fn group_elapsed<A: TimedActivity>(members: &[&A]) -> f64 {
    members
        .iter()
        .map(|a| minutes_of(*a))
        .fold(0.0, f64::max)
}

/// Real elapsed minutes across `activities`
///
/// Standalone activities add their full duration. Each combined group adds
/// the duration of its longest member once.
#[must_use]
pub fn calc_real_duration<A: TimedActivity>(activities: &[A]) -> f64 {
    let parts = partition(activities);

    let standalone: f64 = parts.standalone.iter().map(|a| minutes_of(*a)).sum();
    let grouped: f64 = parts.groups.iter().map(|g| group_elapsed(g)).sum();

    standalone + grouped
}

/// Chart label for a category name; absent or blank names are "Unknown"
#[must_use]
pub fn category_label(category: Option<&str>) -> &str {
    match category {
        Some(name) if !name.trim().is_empty() => name,
        _ => UNKNOWN_CATEGORY,
    }
}

/// Category buckets in first-seen order
#[derive(Default)]
struct CategoryTotals {
    order: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl CategoryTotals {
    fn add(&mut self, category: Option<&str>, minutes: f64) {
        let name = category_label(category);
        if let Some(&i) = self.index.get(name) {
            self.order[i].1 += minutes;
        } else {
            self.index.insert(name.to_owned(), self.order.len());
            self.order.push((name.to_owned(), minutes));
        }
    }

    fn into_slices(self) -> Vec<CategorySlice> {
        self.order
            .into_iter()
            .map(|(name, minutes)| CategorySlice {
                name,
                value: minutes.round() as i64,
            })
            .collect()
    }
}

/// Minutes per category whose total matches [`calc_real_duration`]
///
/// A combined group's elapsed time is shared among its members in proportion
/// to their nominal durations, or evenly when every member is zero. Values
/// are rounded per category after accumulation, so the rounded total can
/// drift from the real duration by up to one minute per category.
#[must_use]
pub fn build_category_chart_data<A: TimedActivity>(activities: &[A]) -> Vec<CategorySlice> {
    let parts = partition(activities);
    let mut totals = CategoryTotals::default();

    for activity in &parts.standalone {
        totals.add(activity.category_name(), minutes_of(*activity));
    }

    for members in &parts.groups {
        let elapsed = group_elapsed(members);
        let nominal: f64 = members.iter().map(|a| minutes_of(*a)).sum();

        for member in members {
            let share = if nominal > 0.0 {
                minutes_of(*member) / nominal * elapsed
            } else {
                elapsed / members.len() as f64
            };
            totals.add(member.category_name(), share);
        }
    }

    totals.into_slices()
}
