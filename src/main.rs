//! Climate Cache - municipal climate-risk API with a warmed response cache

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use climate_cache::api::{create_router, AppState};
use climate_cache::data::{ClimateDataSource, InMemoryDataSource};
use climate_cache::{CacheWarmer, Config, WarmSettings};

/// Main entry point for the climate API server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the dataset behind the data source
/// 4. Create the shared response cache
/// 5. Warm the cache (metadata, then GeoJSON)
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "climate_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting climate API server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, tiered={}, port={}, warm={} ({}/{})",
        config.cache_max_entries,
        config.cache_tiered,
        config.server_port,
        config.warm_on_startup,
        config.warm_scenario,
        config.warm_period
    );

    let data: Arc<dyn ClimateDataSource> = match &config.data_file {
        Some(path) => Arc::new(
            InMemoryDataSource::from_file(path)
                .await
                .with_context(|| format!("loading dataset {}", path.display()))?,
        ),
        None => {
            warn!("DATA_FILE not set, serving an empty dataset");
            Arc::new(InMemoryDataSource::default())
        }
    };

    let state = AppState::from_config(&config, data.clone());
    info!("Cache store initialized");

    // Warm before binding so the first requests are already served from cache
    if config.warm_on_startup && config.cache_enabled {
        let settings = WarmSettings {
            policy: state.policy,
            ..WarmSettings::from_config(&config)
        };
        let warmer = CacheWarmer::new(data, state.cache.clone(), settings);
        let report = warmer.warm().await.context("cache warm-up failed")?;
        info!(warmed = report.warmed, failed = report.failed, "Cache warmed");
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
