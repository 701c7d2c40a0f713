//! Cache Warmer
//!
//! Startup task that installs metadata and GeoJSON responses into the cache
//! before the server accepts traffic.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::Method;
use bytes::Bytes;
use futures::future::join_all;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::cache::keys::{cache_key, geojson_path, INDICES_PATH, MUNICIPALITIES_PATH};
use crate::cache::{CachePolicy, SharedCache};
use crate::config::Config;
use crate::data::catalog::{self, PRIORITY_INDICES};
use crate::data::ClimateDataSource;
use crate::error::{DataError, WarmError};
use crate::models::ListEnvelope;

/// What the warmer fetches and how hard it pushes the data source.
#[derive(Debug, Clone)]
pub struct WarmSettings {
    pub scenario: String,
    pub period: String,
    /// Fetches in flight per batch
    pub batch_size: usize,
    /// Timeout for each data-access call
    pub fetch_timeout: Duration,
    /// Policy whose tiers pick the TTL of warmed entries
    pub policy: CachePolicy,
}

impl WarmSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scenario: config.warm_scenario.clone(),
            period: config.warm_period.clone(),
            batch_size: config.warm_batch_size,
            fetch_timeout: config.warm_fetch_timeout(),
            policy: CachePolicy::from_config(config),
        }
    }
}

impl Default for WarmSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Outcome of a warm run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmReport {
    /// Entries installed in the cache
    pub warmed: usize,
    /// Entries skipped because the fetch was empty, failed, or timed out
    pub failed: usize,
}

/// Populates a cache from a data source.
pub struct CacheWarmer {
    source: Arc<dyn ClimateDataSource>,
    cache: SharedCache,
    settings: WarmSettings,
}

impl CacheWarmer {
    pub fn new(source: Arc<dyn ClimateDataSource>, cache: SharedCache, settings: WarmSettings) -> Self {
        Self {
            source,
            cache,
            settings,
        }
    }

    /// Runs the metadata phase, then the GeoJSON phase.
    ///
    /// Fails only on invalid settings or a hard metadata error; anything else
    /// is counted in the report.
    #[instrument(skip_all, fields(scenario = %self.settings.scenario, period = %self.settings.period))]
    pub async fn warm(&self) -> Result<WarmReport, WarmError> {
        catalog::validate_scenario(&self.settings.scenario).map_err(WarmError::Settings)?;
        catalog::validate_period(&self.settings.period).map_err(WarmError::Settings)?;

        let started = Instant::now();
        let mut report = WarmReport::default();

        info!("Warming metadata");
        let index_codes = self.warm_metadata(&mut report).await?;

        info!(indices = index_codes.len(), "Warming GeoJSON");
        self.warm_geojson(&index_codes, &mut report).await;

        info!(
            warmed = report.warmed,
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Cache warm-up complete"
        );
        Ok(report)
    }

    // == Metadata Phase ==
    /// Warms the index and municipality lists. Returns the index codes the
    /// GeoJSON phase should cover.
    async fn warm_metadata(&self, report: &mut WarmReport) -> Result<Vec<String>, WarmError> {
        let indices = self
            .fetch_metadata(INDICES_PATH, self.source.fetch_all_active_indices())
            .await?;

        let index_codes = match indices {
            Some(indices) => {
                let codes = indices.iter().map(|m| m.code.clone()).collect();
                self.install_envelope(INDICES_PATH, indices).await?;
                report.warmed += 1;
                codes
            }
            None => {
                report.failed += 1;
                catalog::INDEX_CODES.iter().map(|c| c.to_string()).collect()
            }
        };

        let municipalities = self
            .fetch_metadata(MUNICIPALITIES_PATH, self.source.fetch_all_municipalities())
            .await?;

        match municipalities {
            Some(municipalities) => {
                self.install_envelope(MUNICIPALITIES_PATH, municipalities)
                    .await?;
                report.warmed += 1;
            }
            None => report.failed += 1,
        }

        Ok(index_codes)
    }

    /// `Ok(None)` for an empty list or a timeout; `Err` for a hard failure.
    async fn fetch_metadata<T, F>(
        &self,
        route: &'static str,
        fetch: F,
    ) -> Result<Option<Vec<T>>, WarmError>
    where
        F: Future<Output = Result<Vec<T>, DataError>>,
    {
        match timeout(self.settings.fetch_timeout, fetch).await {
            Ok(Ok(records)) if records.is_empty() => {
                warn!(route, "Metadata fetch returned no records, skipping");
                Ok(None)
            }
            Ok(Ok(records)) => Ok(Some(records)),
            Ok(Err(source)) => Err(WarmError::Metadata { route, source }),
            Err(_) => {
                warn!(
                    route,
                    timeout_secs = self.settings.fetch_timeout.as_secs_f64(),
                    "Metadata fetch timed out, skipping"
                );
                Ok(None)
            }
        }
    }

    async fn install_envelope<T: Serialize>(
        &self,
        route: &'static str,
        data: Vec<T>,
    ) -> Result<(), WarmError> {
        let count = data.len();
        let body = serde_json::to_vec(&ListEnvelope::new(data))
            .map_err(|source| WarmError::Serialize { route, source })?;

        self.cache.write().await.store(
            cache_key(&Method::GET, route),
            Bytes::from(body),
            self.settings.policy.tier_for(route).ttl(),
        );
        debug!(route, count, "Metadata warmed");
        Ok(())
    }

    // == GeoJSON Phase ==
    async fn warm_geojson(&self, index_codes: &[String], report: &mut WarmReport) {
        let (priority, remaining) = order_indices(index_codes);
        let batch_size = self.settings.batch_size.max(1);

        for (group, codes) in [("priority", priority), ("remaining", remaining)] {
            let before = *report;

            for batch in codes.chunks(batch_size) {
                let results = join_all(batch.iter().map(|code| self.fetch_geojson(code))).await;

                for (code, payload) in batch.iter().zip(results) {
                    match payload {
                        Some(payload) => {
                            let path =
                                geojson_path(&self.settings.scenario, &self.settings.period, code);
                            let ttl = self.settings.policy.tier_for(&path).ttl();
                            self.cache
                                .write()
                                .await
                                .store(cache_key(&Method::GET, &path), payload, ttl);
                            report.warmed += 1;
                        }
                        None => report.failed += 1,
                    }
                }
            }

            info!(
                group,
                warmed = report.warmed - before.warmed,
                failed = report.failed - before.failed,
                "GeoJSON group warmed"
            );
        }
    }

    /// Serialized feature collection, or `None` when it should be skipped.
    async fn fetch_geojson(&self, index_code: &str) -> Option<Bytes> {
        let fetch = self.source.fetch_geojson(
            &self.settings.scenario,
            &self.settings.period,
            index_code,
        );

        match timeout(self.settings.fetch_timeout, fetch).await {
            Ok(Ok(Some(collection))) if !collection.is_empty() => {
                match serde_json::to_vec(&collection) {
                    Ok(body) => Some(Bytes::from(body)),
                    Err(e) => {
                        warn!(index = index_code, error = %e, "Failed to serialize GeoJSON");
                        None
                    }
                }
            }
            Ok(Ok(_)) => {
                warn!(index = index_code, "No GeoJSON data, skipping");
                None
            }
            Ok(Err(e)) => {
                warn!(index = index_code, error = %e, "GeoJSON fetch failed, skipping");
                None
            }
            Err(_) => {
                warn!(index = index_code, "GeoJSON fetch timed out, skipping");
                None
            }
        }
    }
}

/// Splits codes into the priority group (in priority order) and the rest
/// (in their original order).
pub fn order_indices(index_codes: &[String]) -> (Vec<String>, Vec<String>) {
    let priority: Vec<String> = PRIORITY_INDICES
        .iter()
        .filter(|p| index_codes.iter().any(|c| c == *p))
        .map(|p| p.to_string())
        .collect();

    let remaining = index_codes
        .iter()
        .filter(|c| !priority.contains(c))
        .cloned()
        .collect();

    (priority, remaining)
}
