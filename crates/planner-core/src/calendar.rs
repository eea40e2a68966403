// ABOUTME: Monday-to-Sunday week boundaries and plan week generation
// ABOUTME: Produces contiguous, non-overlapping week ranges for a new plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Season Planner Contributors

//! Week calendar
//!
//! Weeks start on Monday. A plan starting mid-week gets a first week that
//! begins on the preceding Monday, so every generated week covers seven full
//! days.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date range of one generated week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    /// Position in the plan, starting at 1
    pub week_number: u32,
    /// Monday
    pub start_date: NaiveDate,
    /// Sunday
    pub end_date: NaiveDate,
}

/// Monday and Sunday of the week containing `date`
///
/// Returns `None` only when the bounds fall outside chrono's date range.
#[must_use]
pub fn week_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset))?;
    let sunday = monday.checked_add_days(Days::new(6))?;
    Some((monday, sunday))
}

/// Generate `duration_weeks` consecutive weeks for a plan starting on `start_date`
///
/// Week `i` covers the Monday-to-Sunday week containing `start_date + 7*i` days.
/// Returns `None` when the range runs past chrono's supported dates.
#[must_use]
pub fn generate_weeks(start_date: NaiveDate, duration_weeks: u32) -> Option<Vec<WeekRange>> {
    (0..duration_weeks)
        .map(|i| {
            let anchor = start_date.checked_add_days(Days::new(u64::from(i) * 7))?;
            let (start, end) = week_bounds(anchor)?;
            Some(WeekRange {
                week_number: i + 1,
                start_date: start,
                end_date: end,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_bounds_mid_week() {
        // Thursday 2025-09-04
        let (monday, sunday) = week_bounds(date(2025, 9, 4)).unwrap();
        assert_eq!(monday, date(2025, 9, 1));
        assert_eq!(sunday, date(2025, 9, 7));
    }

    #[test]
    fn test_week_bounds_on_sunday_stays_in_same_week() {
        let (monday, sunday) = week_bounds(date(2025, 9, 7)).unwrap();
        assert_eq!(monday, date(2025, 9, 1));
        assert_eq!(sunday, date(2025, 9, 7));
    }

    #[test]
    fn test_generate_weeks_count_and_alignment() {
        let weeks = generate_weeks(date(2025, 8, 6), 52).unwrap();
        assert_eq!(weeks.len(), 52);
        for (i, week) in weeks.iter().enumerate() {
            assert_eq!(week.week_number as usize, i + 1);
            assert_eq!(week.start_date.weekday(), Weekday::Mon);
            assert_eq!(week.end_date.weekday(), Weekday::Sun);
            assert_eq!((week.end_date - week.start_date).num_days(), 6);
        }
    }

    #[test]
    fn test_generated_weeks_are_contiguous() {
        let weeks = generate_weeks(date(2025, 12, 24), 6).unwrap();
        for pair in weeks.windows(2) {
            assert_eq!((pair[1].start_date - pair[0].end_date).num_days(), 1);
        }
        // Crosses the year boundary
        assert_eq!(weeks[1].start_date, date(2025, 12, 29));
        assert_eq!(weeks[2].start_date, date(2026, 1, 5));
    }

    #[test]
    fn test_zero_weeks() {
        assert_eq!(generate_weeks(date(2025, 1, 1), 0).unwrap(), Vec::new());
    }
}
