//! API Module
//!
//! HTTP handlers and routing for the climate-risk API.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /api/indices` - Climate index metadata
//! - `GET /api/municipalities` - Municipality list
//! - `GET /api/scenarios` - Scenario catalog
//! - `GET /api/climate-data/geojson/:scenario/:period/:index` - GeoJSON
//! - `GET /api/cache/stats`, `POST /api/cache/clear` - Cache administration

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
