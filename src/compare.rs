//! Joining two daily series into a comparison table with summary means
//!
//! The table is an inner join on exact date equality: dates present in only
//! one series are dropped silently. The per-city means are deliberately NOT
//! join-dependent; each is computed over its full fetched series, so a city's
//! average reflects everything retrieved for it even when some days fail to
//! pair up.

use std::collections::HashMap;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DailySeries;

/// One fully-paired day in the comparison table
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub temp_a: f64,
    pub temp_b: f64,
}

/// The merged comparison of two cities' series
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Paired rows, ascending by date
    pub rows: Vec<ComparisonRow>,
    /// Mean of city A's full series (join-independent)
    pub mean_a: f64,
    /// Mean of city B's full series (join-independent)
    pub mean_b: f64,
    pub city_a: String,
    pub city_b: String,
}

/// Errors from malformed series reaching the join
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AlignError {
    #[error("series for {city} has duplicate entries for {date}")]
    DuplicateDate { city: String, date: NaiveDate },
    #[error("cannot align an empty series for {city}")]
    EmptySeries { city: String },
}

/// Inner-join two non-empty series on date and compute per-series means.
///
/// Labels are the user-supplied city names, which may differ from the
/// geocoder's canonical location names.
pub fn align(
    series_a: &DailySeries,
    series_b: &DailySeries,
    label_a: &str,
    label_b: &str,
) -> Result<ComparisonResult, AlignError> {
    let mean_a = series_a
        .mean_max_temp()
        .ok_or_else(|| AlignError::EmptySeries {
            city: label_a.to_string(),
        })?;
    let mean_b = series_b
        .mean_max_temp()
        .ok_or_else(|| AlignError::EmptySeries {
            city: label_b.to_string(),
        })?;

    let by_date_b = index_by_date(series_b, label_b)?;
    check_unique_dates(series_a, label_a)?;

    let rows: Vec<ComparisonRow> = series_a
        .entries
        .iter()
        .filter_map(|entry| {
            by_date_b.get(&entry.date).map(|&temp_b| ComparisonRow {
                date: entry.date,
                temp_a: entry.max_temp_c,
                temp_b,
            })
        })
        .collect();

    Ok(ComparisonResult {
        rows,
        mean_a,
        mean_b,
        city_a: label_a.to_string(),
        city_b: label_b.to_string(),
    })
}

fn index_by_date(
    series: &DailySeries,
    label: &str,
) -> Result<HashMap<NaiveDate, f64>, AlignError> {
    let mut by_date = HashMap::with_capacity(series.entries.len());
    for entry in &series.entries {
        if by_date.insert(entry.date, entry.max_temp_c).is_some() {
            return Err(AlignError::DuplicateDate {
                city: label.to_string(),
                date: entry.date,
            });
        }
    }
    Ok(by_date)
}

fn check_unique_dates(series: &DailySeries, label: &str) -> Result<(), AlignError> {
    let mut seen = HashSet::with_capacity(series.entries.len());
    for entry in &series.entries {
        if !seen.insert(entry.date) {
            return Err(AlignError::DuplicateDate {
                city: label.to_string(),
                date: entry.date,
            });
        }
    }
    Ok(())
}
