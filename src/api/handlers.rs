//! API Handlers
//!
//! HTTP request handlers for each endpoint. Read handlers sit behind the
//! response cache; the `/api/cache` handlers operate on it directly.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::cache::{shared_cache, CachePolicy, CacheStats, CacheStore, SharedCache};
use crate::config::Config;
use crate::data::catalog::{PERIODS, SCENARIOS};
use crate::data::{ClimateDataSource, FeatureCollection, IndexMetadata, Municipality};
use crate::error::{ApiError, Result};
use crate::models::{ClearResponse, GeoJsonParams, HealthResponse, ListEnvelope};

/// Application state shared across all handlers.
///
/// The cache handle is the same one the warmer fills at startup.
#[derive(Clone)]
pub struct AppState {
    /// Shared response cache
    pub cache: SharedCache,
    /// Data-access collaborator
    pub data: Arc<dyn ClimateDataSource>,
    /// Cache feature toggles
    pub policy: CachePolicy,
}

impl AppState {
    /// Creates a new AppState with the default cache policy.
    pub fn new(cache: CacheStore, data: Arc<dyn ClimateDataSource>) -> Self {
        Self::with_shared(shared_cache(cache), data, CachePolicy::default())
    }

    /// Creates a new AppState around an existing cache handle.
    pub fn with_shared(
        cache: SharedCache,
        data: Arc<dyn ClimateDataSource>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            cache,
            data,
            policy,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config, data: Arc<dyn ClimateDataSource>) -> Self {
        Self::with_shared(
            shared_cache(CacheStore::new(config.cache_max_entries)),
            data,
            CachePolicy::from_config(config),
        )
    }
}

/// Catalog entry for GET /api/scenarios
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioInfo {
    pub code: &'static str,
    pub periods: Vec<&'static str>,
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /api/indices
pub async fn indices_handler(
    State(state): State<AppState>,
) -> Result<Json<ListEnvelope<IndexMetadata>>> {
    let indices = state.data.fetch_all_active_indices().await?;
    Ok(Json(ListEnvelope::new(indices)))
}

/// Handler for GET /api/municipalities
pub async fn municipalities_handler(
    State(state): State<AppState>,
) -> Result<Json<ListEnvelope<Municipality>>> {
    let municipalities = state.data.fetch_all_municipalities().await?;
    Ok(Json(ListEnvelope::new(municipalities)))
}

/// Handler for GET /api/scenarios
pub async fn scenarios_handler() -> Json<ListEnvelope<ScenarioInfo>> {
    let scenarios = SCENARIOS
        .iter()
        .map(|&code| ScenarioInfo {
            code,
            periods: PERIODS.to_vec(),
        })
        .collect();
    Json(ListEnvelope::new(scenarios))
}

/// Handler for GET /api/climate-data/geojson/:scenario/:period/:index
///
/// Returns the bare feature collection, without an envelope.
pub async fn geojson_handler(
    State(state): State<AppState>,
    Path(params): Path<GeoJsonParams>,
) -> Result<Json<FeatureCollection>> {
    params.validate()?;

    state
        .data
        .fetch_geojson(&params.scenario, &params.period, &params.index)
        .await?
        .filter(|fc| !fc.is_empty())
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No data for {} / {} / {}",
                params.scenario, params.period, params.index
            ))
        })
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for POST /api/cache/clear
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.len();
    cache.clear();
    info!(removed, "Cache cleared");

    Json(ClearResponse::new(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, InMemoryDataSource, IndexValue};

    fn state() -> AppState {
        let dataset = Dataset {
            indices: vec![IndexMetadata {
                code: "HD35".to_string(),
                name: "Hot days".to_string(),
                description: String::new(),
                unit: "days".to_string(),
                category: "temperature".to_string(),
                active: true,
            }],
            municipalities: vec![Municipality {
                code: "TSH".to_string(),
                name: "City of Tshwane".to_string(),
                province: "Gauteng".to_string(),
                district: None,
            }],
            geometries: Default::default(),
            values: vec![IndexValue {
                municipality_code: "TSH".to_string(),
                scenario: "ssp245".to_string(),
                period: "near-term_2021-2040".to_string(),
                index_code: "HD35".to_string(),
                value: 9.0,
            }],
        };
        AppState::new(
            CacheStore::new(100),
            Arc::new(InMemoryDataSource::new(dataset)),
        )
    }

    fn params(scenario: &str, period: &str, index: &str) -> Path<GeoJsonParams> {
        Path(GeoJsonParams {
            scenario: scenario.to_string(),
            period: period.to_string(),
            index: index.to_string(),
        })
    }

    #[tokio::test]
    async fn test_indices_handler() {
        let response = indices_handler(State(state())).await.unwrap();
        assert!(response.success);
        assert_eq!(response.count, 1);
        assert_eq!(response.data[0].code, "HD35");
    }

    #[tokio::test]
    async fn test_municipalities_handler() {
        let response = municipalities_handler(State(state())).await.unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.data[0].province, "Gauteng");
    }

    #[tokio::test]
    async fn test_scenarios_handler() {
        let response = scenarios_handler().await;
        assert_eq!(response.count, 4);
        assert_eq!(response.data[1].code, "ssp245");
        assert_eq!(response.data[1].periods.len(), 3);
    }

    #[tokio::test]
    async fn test_geojson_handler() {
        let response =
            geojson_handler(State(state()), params("ssp245", "near-term_2021-2040", "HD35"))
                .await
                .unwrap();
        assert_eq!(response.kind, "FeatureCollection");
        assert_eq!(response.features.len(), 1);
    }

    #[tokio::test]
    async fn test_geojson_handler_not_found() {
        let result =
            geojson_handler(State(state()), params("ssp585", "near-term_2021-2040", "HD35")).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_geojson_handler_rejects_unknown_index() {
        let result =
            geojson_handler(State(state()), params("ssp245", "near-term_2021-2040", "HD99")).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_cache_stats_and_clear() {
        let state = state();
        state.cache.write().await.store(
            "GET:/x".to_string(),
            bytes::Bytes::from_static(b"{}"),
            std::time::Duration::from_secs(60),
        );

        let stats = cache_stats_handler(State(state.clone())).await;
        assert_eq!(stats.size, 1);
        assert_eq!(stats.max_size, 100);
        assert_eq!(stats.hit_rate, "0%");

        let cleared = cache_clear_handler(State(state.clone())).await;
        assert!(cleared.success);
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
