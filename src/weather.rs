//! Historical daily maximum temperatures from the weather archive service
//!
//! The fetcher never returns an `Err`: the outcome enum carries the result,
//! with timeouts kept distinct from other failures only so the caller can
//! show the "archive is busy" message. Day boundaries follow the location's
//! local timezone (`timezone=auto`, resolved upstream from the coordinates).

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::cache::TtlCache;
use crate::config::ArchiveConfig;
use crate::models::{DailyEntry, DailySeries, DateRange, Location};

/// Result of fetching a daily series for one location
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A non-empty series was retrieved
    Data(DailySeries),
    /// The archive answered but had no data for the range
    Empty,
    /// The request hit the bounded timeout
    Timeout,
    /// Any other transport, status or parse failure
    Failed(String),
}

/// Client for the weather archive service, with a per-query result cache
pub struct WeatherFetcher {
    client: Client,
    base_url: String,
    cache: TtlCache<Vec<DailyEntry>>,
}

impl WeatherFetcher {
    /// Create a new fetcher from configuration
    pub fn new(config: &ArchiveConfig, cache_ttl: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("SkyCast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create archive HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: TtlCache::new(cache_ttl),
        })
    }

    /// Fetch the daily maximum temperature series for `location` over `range`.
    #[instrument(skip(self, location), fields(city = %location.name))]
    pub async fn fetch_daily_max(&self, location: &Location, range: &DateRange) -> FetchOutcome {
        let key = location.series_cache_key(range);
        if let Some(entries) = self.cache.get(&key) {
            return Self::outcome_from_entries(location, entries);
        }

        match self.lookup(location, range).await {
            Ok(entries) => {
                debug!(
                    "Archive returned {} day(s) for {}",
                    entries.len(),
                    location.name
                );
                self.cache.put(&key, entries.clone());
                Self::outcome_from_entries(location, entries)
            }
            Err(e) if e.is_timeout() => {
                warn!("Archive request for {} timed out", location.name);
                FetchOutcome::Timeout
            }
            Err(e) => {
                warn!("Archive request for {} failed: {}", location.name, e);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }

    fn outcome_from_entries(location: &Location, entries: Vec<DailyEntry>) -> FetchOutcome {
        if entries.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Data(DailySeries::new(location.clone(), entries))
        }
    }

    async fn lookup(
        &self,
        location: &Location,
        range: &DateRange,
    ) -> Result<Vec<DailyEntry>, reqwest::Error> {
        let url = format!(
            "{}/v1/archive?latitude={}&longitude={}&start_date={}&end_date={}&daily=temperature_2m_max&timezone=auto",
            self.base_url,
            location.latitude,
            location.longitude,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
        );

        let response: archive::ArchiveResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.daily.map(archive::parse_entries).unwrap_or_default())
    }
}

/// Archive service response structures
mod archive {
    use serde::Deserialize;
    use tracing::warn;

    use super::{DailyEntry, NaiveDate};

    #[derive(Debug, Deserialize)]
    pub struct ArchiveResponse {
        pub daily: Option<DailyData>,
    }

    /// Parallel equal-length arrays, one slot per day
    #[derive(Debug, Default, Deserialize)]
    pub struct DailyData {
        #[serde(default)]
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max", default)]
        pub temperature_max: Vec<Option<f64>>,
    }

    /// Zip the parallel arrays into entries, preserving the service's
    /// ascending date order. Null temperature slots and unparseable dates
    /// are skipped.
    pub fn parse_entries(daily: DailyData) -> Vec<DailyEntry> {
        daily
            .time
            .iter()
            .zip(daily.temperature_max.iter())
            .filter_map(|(date, temp)| {
                let max_temp_c = (*temp)?;
                match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                    Ok(date) => Some(DailyEntry { date, max_temp_c }),
                    Err(_) => {
                        warn!("Skipping unparseable archive date '{}'", date);
                        None
                    }
                }
            })
            .collect()
    }
}
