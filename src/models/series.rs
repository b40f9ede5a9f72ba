//! Date ranges and daily temperature series

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SkycastError;
use crate::models::Location;

/// An inclusive range of calendar days, never extending into the future
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end` and future endpoints.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SkycastError> {
        if start > end {
            return Err(SkycastError::validation(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let today = Local::now().date_naive();
        if end > today {
            return Err(SkycastError::validation(format!(
                "end date {end} is in the future"
            )));
        }
        Ok(Self { start, end })
    }

    /// The trailing `days`-day window ending today.
    #[must_use]
    pub fn last_days(days: i64) -> Self {
        let end = Local::now().date_naive();
        let start = end - chrono::Duration::days(days);
        Self { start, end }
    }

    /// Number of calendar days covered, inclusive of both endpoints.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One day's maximum temperature reading
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    /// Daily maximum temperature in °C
    pub max_temp_c: f64,
}

/// A per-day maximum temperature series for one location, ascending by date
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySeries {
    pub location: Location,
    pub entries: Vec<DailyEntry>,
}

impl DailySeries {
    #[must_use]
    pub fn new(location: Location, entries: Vec<DailyEntry>) -> Self {
        Self { location, entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Arithmetic mean of the daily maxima; `None` for an empty series.
    #[must_use]
    pub fn mean_max_temp(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(|e| e.max_temp_c).sum();
        Some(sum / self.entries.len() as f64)
    }
}
