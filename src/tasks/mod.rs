//! Startup Tasks Module
//!
//! Contains tasks that run before the server starts accepting traffic.
//!
//! # Tasks
//! - Cache warming: installs metadata and GeoJSON responses into the cache

mod warmer;

pub use warmer::{order_indices, CacheWarmer, WarmReport, WarmSettings};
