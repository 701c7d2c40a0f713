//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order eviction
//! and lazy TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

// == Cache Store ==
/// Bounded response store with per-entry TTL.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to entry storage
    entries: HashMap<String, CacheEntry>,
    /// Insertion order tracker
    order: InsertionOrder,
    /// Hit/miss/eviction counters
    counters: Counters,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity (at least one entry).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            counters: Counters::default(),
            max_entries: max_entries.max(1),
        }
    }

    // == Lookup ==
    /// Returns a fresh entry for `key`.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn lookup(&mut self, key: &str) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let entry = entry.clone();
                self.counters.record_hit();
                Some(entry)
            }
            Some(_) => {
                self.entries.remove(key);
                self.order.remove(key);
                self.counters.record_miss();
                debug!(key, "expired entry removed on lookup");
                None
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Store ==
    /// Inserts or replaces the entry for `key`.
    ///
    /// A new key arriving at capacity evicts the oldest-inserted entry first.
    pub fn store(&mut self, key: String, payload: Bytes, ttl: Duration) {
        self.insert(CacheEntry::new(key, payload, ttl));
    }

    /// Inserts an already built entry under its own key.
    ///
    /// Same capacity rules as [`CacheStore::store`].
    pub fn insert(&mut self, entry: CacheEntry) {
        let is_new = !self.entries.contains_key(&entry.key);

        if is_new && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.order.pop_oldest() {
                self.entries.remove(&evicted_key);
                self.counters.record_eviction();
                debug!(key = %evicted_key, "evicted oldest entry for capacity");
            }
        }

        // Replacing an entry keeps its place in the eviction queue
        if is_new {
            self.order.record(&entry.key);
        }
        self.entries.insert(entry.key.clone(), entry);
    }

    /// Serializes `value` to JSON and stores it.
    pub fn store_json<T: Serialize>(
        &mut self,
        key: String,
        value: &T,
        ttl: Duration,
    ) -> serde_json::Result<()> {
        let payload = serde_json::to_vec(value)?;
        self.store(key, Bytes::from(payload), ttl);
        Ok(())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats::snapshot(self.counters, self.entries.len(), self.max_entries)
    }

    // == Clear ==
    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.counters.reset();
    }

    /// Checks for a key without touching counters or expiry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
