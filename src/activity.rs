use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Hours logged per calendar date, the data behind the study-consistency
/// heatmap. Kept separate from the plan: it survives a plan reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub entries: HashMap<NaiveDate, f32>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a change in logged hours against a date. Negative deltas
    /// (the user revising an entry downward) floor the date at zero; a date
    /// at zero is dropped so the blob does not accumulate empty entries.
    pub fn add_hours(&mut self, date: NaiveDate, delta: f32) {
        let total = (self.hours_on(date) + delta).max(0.0);
        if total > 0.0 {
            self.entries.insert(date, total);
        } else {
            self.entries.remove(&date);
        }
    }

    pub fn hours_on(&self, date: NaiveDate) -> f32 {
        self.entries.get(&date).copied().unwrap_or(0.0)
    }

    pub fn total_hours(&self) -> f32 {
        self.entries.values().sum()
    }

    /// Number of dates with any logged study time
    pub fn active_days(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn accumulates_hours_per_date() {
        let mut log = ActivityLog::new();
        log.add_hours(date(1), 2.0);
        log.add_hours(date(1), 1.5);
        log.add_hours(date(2), 4.0);

        assert_eq!(log.hours_on(date(1)), 3.5);
        assert_eq!(log.total_hours(), 7.5);
        assert_eq!(log.active_days(), 2);
    }

    #[test]
    fn negative_delta_floors_at_zero_and_drops_entry() {
        let mut log = ActivityLog::new();
        log.add_hours(date(1), 2.0);
        log.add_hours(date(1), -5.0);

        assert_eq!(log.hours_on(date(1)), 0.0);
        assert_eq!(log.active_days(), 0);
    }
}
