//! Orchestration of the compare pipeline
//!
//! One user request runs the full state machine to completion:
//! `Idle → ValidatingInput → ResolvingLocations → FetchingWeather` and then
//! one of the terminal outcomes. Geocoding runs A then B so that an unknown
//! city A skips every later upstream call; the two weather fetches are
//! independent and run concurrently. Nothing is retried; any terminal
//! outcome leaves the pipeline ready for the next request.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::compare::{self, ComparisonResult};
use crate::config::SkycastConfig;
use crate::geocoder::{GeocodeOutcome, Geocoder};
use crate::models::{DailySeries, DateRange};
use crate::weather::{FetchOutcome, WeatherFetcher};

/// Which of the two cities an outcome refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    A,
    B,
}

impl City {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            City::A => "City A",
            City::B => "City B",
        }
    }
}

/// Pipeline phases, traced as the run progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    ValidatingInput,
    ResolvingLocations,
    FetchingWeather,
}

/// One comparison request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareInput {
    pub city_a: String,
    pub city_b: String,
    /// Range endpoints; both `None` selects the default trailing window
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Terminal outcome of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Input incomplete or malformed; a passive prompt, not an error
    Prompt,
    /// A city name could not be resolved; nothing further was fetched
    LocationError { city: City, name: String },
    /// At least one weather fetch came back empty or failed
    NoData { timed_out: bool },
    /// The join step rejected the fetched series
    AlignmentError { message: String },
    /// Both series fetched; comparison computed
    Ready(ComparisonResult),
}

impl RunOutcome {
    /// The user-facing message for this outcome
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RunOutcome::Prompt => {
                "Please enter both cities and select a valid date range to view the analytics."
                    .to_string()
            }
            RunOutcome::LocationError { city, name } => {
                format!("Could not find location for {}: {}", city.label(), name)
            }
            RunOutcome::NoData { timed_out: true } => {
                "The weather archive is busy (request timed out). Please try again.".to_string()
            }
            RunOutcome::NoData { timed_out: false } => {
                "No weather data found for the selected date range.".to_string()
            }
            RunOutcome::AlignmentError { .. } => "Error creating comparison table.".to_string(),
            RunOutcome::Ready(result) => {
                format!(
                    "Max Daily Temperature: {} vs {}",
                    result.city_a, result.city_b
                )
            }
        }
    }
}

/// Owns the components and their caches; one instance serves all requests
pub struct Pipeline {
    geocoder: Geocoder,
    fetcher: WeatherFetcher,
    default_range_days: i64,
}

impl Pipeline {
    /// Build the pipeline, wiring the shared cache TTL into both components.
    pub fn new(config: &SkycastConfig) -> Result<Self> {
        let ttl = Duration::from_secs(config.cache.ttl_seconds);
        Ok(Self {
            geocoder: Geocoder::new(&config.geocoding, ttl)?,
            fetcher: WeatherFetcher::new(&config.archive, ttl)?,
            default_range_days: i64::from(config.defaults.range_days),
        })
    }

    /// Run one comparison request to completion.
    #[instrument(skip(self), fields(city_a = %input.city_a, city_b = %input.city_b))]
    pub async fn run(&self, input: &CompareInput) -> RunOutcome {
        trace_phase(Phase::ValidatingInput);
        let (city_a, city_b, range) = match self.validate(input) {
            Some(valid) => valid,
            None => return RunOutcome::Prompt,
        };

        trace_phase(Phase::ResolvingLocations);
        let location_a = match self.geocoder.resolve(city_a).await {
            GeocodeOutcome::Found(location) => location,
            GeocodeOutcome::NotFound => {
                return RunOutcome::LocationError {
                    city: City::A,
                    name: city_a.to_string(),
                };
            }
        };
        let location_b = match self.geocoder.resolve(city_b).await {
            GeocodeOutcome::Found(location) => location,
            GeocodeOutcome::NotFound => {
                return RunOutcome::LocationError {
                    city: City::B,
                    name: city_b.to_string(),
                };
            }
        };

        trace_phase(Phase::FetchingWeather);
        let (outcome_a, outcome_b) = tokio::join!(
            self.fetcher.fetch_daily_max(&location_a, &range),
            self.fetcher.fetch_daily_max(&location_b, &range),
        );

        let timed_out = matches!(outcome_a, FetchOutcome::Timeout)
            || matches!(outcome_b, FetchOutcome::Timeout);
        let (series_a, series_b) = match (outcome_a, outcome_b) {
            (FetchOutcome::Data(a), FetchOutcome::Data(b)) => (a, b),
            _ => return RunOutcome::NoData { timed_out },
        };

        self.finish(&series_a, &series_b, city_a, city_b)
    }

    /// Check names and range; `None` means "stay idle and prompt".
    fn validate<'a>(&self, input: &'a CompareInput) -> Option<(&'a str, &'a str, DateRange)> {
        let city_a = input.city_a.trim();
        let city_b = input.city_b.trim();
        if city_a.is_empty() || city_b.is_empty() {
            debug!("Missing city name; staying idle");
            return None;
        }

        let range = match (input.start, input.end) {
            (None, None) => DateRange::last_days(self.default_range_days),
            (Some(start), Some(end)) => match DateRange::new(start, end) {
                Ok(range) => range,
                Err(e) => {
                    debug!("Rejected date range: {}", e);
                    return None;
                }
            },
            // A single endpoint is a half-finished picker, not an error
            _ => {
                debug!("Date range has only one endpoint; staying idle");
                return None;
            }
        };

        Some((city_a, city_b, range))
    }

    fn finish(
        &self,
        series_a: &DailySeries,
        series_b: &DailySeries,
        city_a: &str,
        city_b: &str,
    ) -> RunOutcome {
        match compare::align(series_a, series_b, city_a, city_b) {
            Ok(result) => {
                info!(
                    "Comparison ready: {} paired row(s), means {:.1}°C / {:.1}°C",
                    result.rows.len(),
                    result.mean_a,
                    result.mean_b
                );
                RunOutcome::Ready(result)
            }
            Err(e) => RunOutcome::AlignmentError {
                message: e.to_string(),
            },
        }
    }
}

fn trace_phase(phase: Phase) {
    debug!(?phase, "pipeline phase");
}
