//! Core data models shared across the pipeline

pub mod location;
pub mod series;

pub use location::Location;
pub use series::{DailyEntry, DailySeries, DateRange};
