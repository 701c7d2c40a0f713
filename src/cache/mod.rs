//! Cache Module
//!
//! In-memory response cache with tiered TTLs, ETag fingerprints, and
//! insertion-order eviction, plus the axum middleware that fronts handlers.

mod entry;
pub mod keys;
pub mod middleware;
mod order;
mod stats;
mod store;
mod ttl;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, fingerprint, CacheEntry};
pub use middleware::{response_cache_layer, CacheLayerState, CachePolicy};
pub use order::InsertionOrder;
pub use stats::{format_hit_rate, CacheStats};
pub use store::CacheStore;
pub use ttl::{classify_ttl, TtlTier};

/// Cache handle shared by the middleware, the admin handlers, and the warmer.
pub type SharedCache = Arc<RwLock<CacheStore>>;

/// Wraps a store for sharing.
pub fn shared_cache(store: CacheStore) -> SharedCache {
    Arc::new(RwLock::new(store))
}
