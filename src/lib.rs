//! Climate Cache - municipal climate-risk API with a warmed response cache
//!
//! Serves climate index metadata, municipality lists, and GeoJSON feature
//! collections behind a tiered-TTL, ETag-aware response cache that is filled
//! before the server accepts traffic.

pub mod api;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{CacheWarmer, WarmReport, WarmSettings};
