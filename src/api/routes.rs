//! API Routes
//!
//! Configures the Axum router with all endpoints and the response cache.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_clear_handler, cache_stats_handler, geojson_handler, health_handler, indices_handler,
    municipalities_handler, scenarios_handler, AppState,
};
use crate::cache::keys::{INDICES_PATH, MUNICIPALITIES_PATH};
use crate::cache::{response_cache_layer, CacheLayerState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /api/indices` - Active climate index metadata
/// - `GET /api/municipalities` - Municipality summaries
/// - `GET /api/scenarios` - Scenario and period catalog
/// - `GET /api/climate-data/geojson/:scenario/:period/:index` - Feature collection
/// - `GET /api/cache/stats` - Cache statistics (never cached)
/// - `POST /api/cache/clear` - Empty the cache (never cached)
///
/// # Middleware
/// - Response cache: serves and captures GET responses
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cache_layer = CacheLayerState {
        cache: state.cache.clone(),
        policy: state.policy,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(INDICES_PATH, get(indices_handler))
        .route(MUNICIPALITIES_PATH, get(municipalities_handler))
        .route("/api/scenarios", get(scenarios_handler))
        .route(
            "/api/climate-data/geojson/:scenario/:period/:index",
            get(geojson_handler),
        )
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache/clear", post(cache_clear_handler))
        .layer(middleware::from_fn_with_state(cache_layer, response_cache_layer))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::data::InMemoryDataSource;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(
            CacheStore::new(100),
            Arc::new(InMemoryDataSource::default()),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["cache-control"], "public, max-age=3600");
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-cache").is_none());
    }

    #[tokio::test]
    async fn test_clear_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/cache/clear")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_geojson_bad_index() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/climate-data/geojson/ssp245/near-term_2021-2040/NOPE")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["x-cache"], "MISS");
    }
}
