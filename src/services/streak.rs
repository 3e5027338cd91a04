// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily streak accounting.
//!
//! A streak counts consecutive calendar days with at least one contribution,
//! across all of a user's duels.

use chrono::NaiveDate;

/// What a contribution on `today` does to a user's streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Already counted today.
    Unchanged,
    /// First contribution ever, or the previous run was broken.
    Started,
    /// Contributed yesterday, run goes on.
    Continued,
}

/// Classify a contribution on `today` given the previous contribution day.
pub fn classify(last_contributed: Option<NaiveDate>, today: NaiveDate) -> StreakChange {
    match last_contributed {
        Some(last) if last == today => StreakChange::Unchanged,
        None => StreakChange::Started,
        Some(last) if today.pred_opt() == Some(last) => StreakChange::Continued,
        // Gaps and dates in the future both restart the run
        Some(_) => StreakChange::Started,
    }
}

/// New `(streak, last_contributed_date)` after a contribution on `today`.
pub fn next_streak(
    last_contributed: Option<NaiveDate>,
    current: u32,
    today: NaiveDate,
) -> (u32, Option<NaiveDate>) {
    match classify(last_contributed, today) {
        StreakChange::Unchanged => (current, last_contributed),
        StreakChange::Started => (1, Some(today)),
        StreakChange::Continued => (current.saturating_add(1), Some(today)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_first_contribution_starts_streak() {
        assert_eq!(next_streak(None, 0, day(5)), (1, Some(day(5))));
    }

    #[test]
    fn test_same_day_is_noop() {
        assert_eq!(next_streak(Some(day(5)), 3, day(5)), (3, Some(day(5))));
    }

    #[test]
    fn test_consecutive_day_continues() {
        assert_eq!(next_streak(Some(day(4)), 3, day(5)), (4, Some(day(5))));
    }

    #[test]
    fn test_gap_resets() {
        assert_eq!(next_streak(Some(day(2)), 7, day(5)), (1, Some(day(5))));
    }

    #[test]
    fn test_future_last_date_resets() {
        assert_eq!(next_streak(Some(day(9)), 7, day(5)), (1, Some(day(5))));
    }

    #[test]
    fn test_continues_across_year_boundary() {
        let dec31 = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(classify(Some(dec31), jan1), StreakChange::Continued);
    }

    #[test]
    fn test_run_of_days_counts_each_day_once() {
        let mut streak = 0;
        let mut last = None;
        for d in 1..=6 {
            // Two contributions per day, as with two duels
            for _ in 0..2 {
                (streak, last) = next_streak(last, streak, day(d));
            }
        }
        assert_eq!(streak, 6);
        assert_eq!(last, Some(day(6)));
    }
}
