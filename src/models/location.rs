//! Location model for geocoded coordinates and metadata

use serde::{Deserialize, Serialize};

use crate::models::DateRange;

/// A place name resolved to geographic coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country name, when the geocoder reported one
    pub country: Option<String>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, name: String) -> Self {
        Self {
            latitude,
            longitude,
            name,
            country: None,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Cache key for a daily series fetched for this location over `range`.
    /// Coordinates are rounded so that geocoder jitter in the far decimals
    /// does not split cache entries.
    #[must_use]
    pub fn series_cache_key(&self, range: &DateRange) -> String {
        format!(
            "archive:{:.4}:{:.4}:{}:{}",
            self.latitude,
            self.longitude,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_series_cache_key() {
        let location = Location::new(40.7127, -74.006, "New York".to_string());
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .unwrap();
        assert_eq!(
            location.series_cache_key(&range),
            "archive:40.7127:-74.0060:2024-06-01:2024-06-30"
        );
    }

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(51.5074, -0.1278, "London".to_string());
        assert_eq!(location.format_coordinates(), "51.5074, -0.1278");
    }
}
