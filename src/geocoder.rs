//! City name resolution via the Open-Meteo geocoding service
//!
//! Every failure mode (network error, timeout, non-2xx, empty result set)
//! collapses to `NotFound`; the distinction only matters for logging. The
//! resolved outcome, including `NotFound`, is cached by name.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::cache::TtlCache;
use crate::config::GeocodingConfig;
use crate::models::Location;

/// Result of resolving a free-text place name
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(Location),
    NotFound,
}

/// Client for the geocoding service, with a per-name result cache
pub struct Geocoder {
    client: Client,
    base_url: String,
    cache: TtlCache<Option<Location>>,
}

impl Geocoder {
    /// Create a new geocoder from configuration
    pub fn new(config: &GeocodingConfig, cache_ttl: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("SkyCast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create geocoding HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: TtlCache::new(cache_ttl),
        })
    }

    /// Resolve a city name to coordinates, best match first.
    ///
    /// An empty or whitespace-only name short-circuits to `NotFound` without
    /// touching the network or the cache.
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> GeocodeOutcome {
        let name = name.trim();
        if name.is_empty() {
            return GeocodeOutcome::NotFound;
        }

        let key = format!("geocode:{name}");
        if let Some(cached) = self.cache.get(&key) {
            return match cached {
                Some(location) => GeocodeOutcome::Found(location),
                None => GeocodeOutcome::NotFound,
            };
        }

        let resolved = self.lookup(name).await;
        match &resolved {
            Ok(Some(location)) => {
                debug!(
                    "Resolved '{}' to {} ({})",
                    name,
                    location.name,
                    location.format_coordinates()
                );
            }
            Ok(None) => debug!("No geocoding results for '{}'", name),
            Err(e) => warn!("Geocoding '{}' failed: {:#}", name, e),
        }

        // The upstream "no match" answer is cached alongside hits; transport
        // errors are not, so a transient outage does not stick for an hour.
        match resolved {
            Ok(maybe_location) => {
                self.cache.put(&key, maybe_location.clone());
                match maybe_location {
                    Some(location) => GeocodeOutcome::Found(location),
                    None => GeocodeOutcome::NotFound,
                }
            }
            Err(_) => GeocodeOutcome::NotFound,
        }
    }

    async fn lookup(&self, name: &str) -> Result<Option<Location>> {
        let url = format!(
            "{}/v1/search?name={}&count=1&language=en&format=json",
            self.base_url,
            urlencoding::encode(name)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Geocoding request failed")?
            .error_for_status()
            .with_context(|| "Geocoding service returned an error status")?;

        let body: openmeteo::GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        Ok(body
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Location::from))
    }
}

/// Geocoding service response structures
mod openmeteo {
    use serde::Deserialize;

    use crate::models::Location;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for Location {
        fn from(result: GeocodingResult) -> Self {
            Location {
                latitude: result.latitude,
                longitude: result.longitude,
                name: result.name,
                country: result.country,
            }
        }
    }
}
