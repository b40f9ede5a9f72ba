//! `SkyCast` - historical daily max-temperature comparison between two cities
//!
//! This library provides the geocode → fetch → align pipeline behind the
//! dashboard: resolving city names to coordinates, retrieving daily maximum
//! temperature series from a weather archive, and merging the two series
//! into a comparison table with per-city means.

pub mod api;
pub mod cache;
pub mod compare;
pub mod config;
pub mod error;
pub mod geocoder;
pub mod models;
pub mod pipeline;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::TtlCache;
pub use compare::{AlignError, ComparisonResult, ComparisonRow, align};
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use geocoder::{GeocodeOutcome, Geocoder};
pub use models::{DailyEntry, DailySeries, DateRange, Location};
pub use pipeline::{City, CompareInput, Pipeline, RunOutcome};
pub use weather::{FetchOutcome, WeatherFetcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
