//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::middleware::DEFAULT_MAX_BODY_BYTES;
use crate::data::catalog::{DEFAULT_PERIOD, DEFAULT_SCENARIO};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cached responses
    pub cache_max_entries: usize,
    /// Serve requests through the response cache
    pub cache_enabled: bool,
    /// Tiered TTLs with ETag and conditional requests
    pub cache_tiered: bool,
    /// Largest response body the cache will buffer
    pub cache_max_body_bytes: usize,
    /// Warm the cache before accepting traffic
    pub warm_on_startup: bool,
    /// Scenario warmed for every index
    pub warm_scenario: String,
    /// Period warmed for every index
    pub warm_period: String,
    /// GeoJSON fetches issued concurrently per batch
    pub warm_batch_size: usize,
    /// Timeout applied to each data-access call while warming, in seconds
    pub warm_fetch_timeout_secs: u64,
    /// Optional JSON dataset backing the in-memory data source
    pub data_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3001)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached responses (default: 1000)
    /// - `CACHE_ENABLED` - Enable the response cache (default: true)
    /// - `CACHE_TIERED` - Tiered TTLs and ETags (default: true)
    /// - `CACHE_MAX_BODY_BYTES` - Body buffer limit (default: 32 MiB)
    /// - `WARM_ON_STARTUP` - Run the cache warmer (default: true)
    /// - `WARM_SCENARIO` - Warmed scenario (default: ssp245)
    /// - `WARM_PERIOD` - Warmed period (default: near-term_2021-2040)
    /// - `WARM_BATCH_SIZE` - Concurrent fetches per batch (default: 3)
    /// - `WARM_FETCH_TIMEOUT_SECS` - Per-fetch timeout (default: 30)
    /// - `DATA_FILE` - Path to the JSON dataset (default: unset)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source, falling back to defaults
    /// for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            cache_max_entries: parse_var(&lookup, "CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_enabled: parse_var(&lookup, "CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            cache_tiered: parse_var(&lookup, "CACHE_TIERED").unwrap_or(defaults.cache_tiered),
            cache_max_body_bytes: parse_var(&lookup, "CACHE_MAX_BODY_BYTES")
                .unwrap_or(defaults.cache_max_body_bytes),
            warm_on_startup: parse_var(&lookup, "WARM_ON_STARTUP")
                .unwrap_or(defaults.warm_on_startup),
            warm_scenario: lookup("WARM_SCENARIO").unwrap_or(defaults.warm_scenario),
            warm_period: lookup("WARM_PERIOD").unwrap_or(defaults.warm_period),
            warm_batch_size: parse_var(&lookup, "WARM_BATCH_SIZE")
                .unwrap_or(defaults.warm_batch_size),
            warm_fetch_timeout_secs: parse_var(&lookup, "WARM_FETCH_TIMEOUT_SECS")
                .unwrap_or(defaults.warm_fetch_timeout_secs),
            data_file: lookup("DATA_FILE").map(PathBuf::from),
        }
    }

    pub fn warm_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.warm_fetch_timeout_secs)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            cache_max_entries: 1000,
            cache_enabled: true,
            cache_tiered: true,
            cache_max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            warm_on_startup: true,
            warm_scenario: DEFAULT_SCENARIO.to_string(),
            warm_period: DEFAULT_PERIOD.to_string(),
            warm_batch_size: 3,
            warm_fetch_timeout_secs: 30,
            data_file: None,
        }
    }
}
