//! Configuration management for the `SkyCast` application
//!
//! Handles loading configuration from an optional `config.toml` plus
//! `SKYCAST_`-prefixed environment variables, and validates the result.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SkycastError;

/// Root configuration structure for the `SkyCast` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Weather archive service configuration
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Result cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Default dashboard inputs
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the geocoding service
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Weather archive service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Base URL of the weather archive service
    #[serde(default = "default_archive_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Result cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the static dashboard assets
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
}

/// Default dashboard inputs used when the caller supplies none
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default first city
    #[serde(default = "default_city_a")]
    pub city_a: String,
    /// Default second city
    #[serde(default = "default_city_b")]
    pub city_b: String,
    /// Default comparison window, in days back from today
    #[serde(default = "default_range_days")]
    pub range_days: u32,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_archive_base_url() -> String {
    "https://archive-api.open-meteo.com".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_port() -> u16 {
    8080
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_city_a() -> String {
    "New York".to_string()
}

fn default_city_b() -> String {
    "London".to_string()
}

fn default_range_days() -> u32 {
    30
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: default_archive_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city_a: default_city_a(),
            city_b: default_city_b(),
            range_days: default_range_days(),
        }
    }
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig::default(),
            archive: ArchiveConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl SkycastConfig {
    /// Load configuration from `config.toml` (if present) and environment
    /// variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SKYCAST_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.geocoding.base_url.is_empty() {
            return Err(SkycastError::config("geocoding.base_url must not be empty").into());
        }
        if self.archive.base_url.is_empty() {
            return Err(SkycastError::config("archive.base_url must not be empty").into());
        }
        if self.geocoding.timeout_seconds == 0 || self.archive.timeout_seconds == 0 {
            return Err(SkycastError::config("timeout_seconds must be at least 1").into());
        }
        if self.cache.ttl_seconds == 0 {
            return Err(SkycastError::config("cache.ttl_seconds must be at least 1").into());
        }
        if self.defaults.range_days == 0 {
            return Err(SkycastError::config("defaults.range_days must be at least 1").into());
        }
        Ok(())
    }
}
