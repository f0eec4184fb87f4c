//! Calendar and streak aggregation over logged record dates

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::store::ExerciseTable;

/// Distinct training days, derived from every record's date across the
/// whole table. Unparsable dates are skipped.
pub struct Calendar {
    days: BTreeSet<NaiveDate>,
}

impl Calendar {
    pub fn from_dates<'a>(dates: impl IntoIterator<Item = &'a str>) -> Self {
        let days = dates
            .into_iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect();
        Self { days }
    }

    pub fn from_table(table: &ExerciseTable) -> Self {
        Self::from_dates(
            table
                .values()
                .flatten()
                .flat_map(|e| &e.records)
                .map(|r| r.date.as_str()),
        )
    }

    /// Total number of distinct days with at least one logged record.
    pub fn training_days(&self) -> usize {
        self.days.len()
    }

    /// Consecutive run ending today. A run ending yesterday still counts,
    /// so the streak is not reported broken before today's session.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        let mut day = if self.days.contains(&today) {
            today
        } else {
            match today.pred_opt() {
                Some(yesterday) if self.days.contains(&yesterday) => yesterday,
                _ => return 0,
            }
        };
        let mut streak = 1;
        while let Some(prev) = day.pred_opt() {
            if !self.days.contains(&prev) {
                break;
            }
            streak += 1;
            day = prev;
        }
        streak
    }

    /// Longest consecutive run anywhere in the history.
    pub fn longest_streak(&self) -> u32 {
        let mut best = 0u32;
        let mut run = 0u32;
        let mut prev: Option<NaiveDate> = None;
        for &day in &self.days {
            run = match prev {
                Some(p) if p.succ_opt() == Some(day) => run + 1,
                _ => 1,
            };
            best = best.max(run);
            prev = Some(day);
        }
        best
    }

    /// Trained days within one calendar month, for the month view.
    pub fn days_in_month(&self, year: i32, month: u32) -> usize {
        self.days
            .iter()
            .filter(|d| d.year() == year && d.month() == month)
            .count()
    }

    /// Training days per week over the whole logged span.
    pub fn weekly_frequency(&self) -> f64 {
        let (Some(first), Some(last)) = (self.days.first(), self.days.last()) else {
            return 0.0;
        };
        let span = (*last - *first).num_days() as f64;
        if span == 0.0 {
            return self.days.len() as f64;
        }
        (self.days.len() as f64 / span) * 7.0
    }
}
