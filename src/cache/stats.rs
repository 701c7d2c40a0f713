//! Cache Statistics Module
//!
//! Hit/miss/eviction counters and the snapshot served by the stats endpoint.

use serde::Serialize;

// == Counters ==
/// Running counters kept by the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Stats ==
/// Point-in-time cache statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found a fresh entry
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries evicted for capacity
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// `hits / (hits + misses)` as a percentage, e.g. `"75.00%"`
    pub hit_rate: String,
}

impl CacheStats {
    /// Builds a snapshot from counters and current sizes.
    pub fn snapshot(counters: Counters, size: usize, max_size: usize) -> Self {
        Self {
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            size,
            max_size,
            hit_rate: format_hit_rate(counters.hits, counters.misses),
        }
    }
}

// == Hit Rate ==
/// Formats the hit rate with two decimals, or `"0%"` before any lookup.
pub fn format_hit_rate(hits: u64, misses: u64) -> String {
    let total = hits + misses;
    if total == 0 {
        "0%".to_string()
    } else {
        format!("{:.2}%", hits as f64 / total as f64 * 100.0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(format_hit_rate(0, 0), "0%");
    }

    #[test]
    fn test_hit_rate_three_hits_one_miss() {
        assert_eq!(format_hit_rate(3, 1), "75.00%");
    }

    #[test]
    fn test_hit_rate_all_hits_and_all_misses() {
        assert_eq!(format_hit_rate(4, 0), "100.00%");
        assert_eq!(format_hit_rate(0, 2), "0.00%");
    }

    #[test]
    fn test_hit_rate_rounding() {
        assert_eq!(format_hit_rate(1, 2), "33.33%");
        assert_eq!(format_hit_rate(2, 1), "66.67%");
    }

    #[test]
    fn test_counters_reset() {
        let mut counters = Counters::default();
        counters.record_hit();
        counters.record_miss();
        counters.record_eviction();
        counters.reset();

        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut counters = Counters::default();
        counters.record_hit();
        let stats = CacheStats::snapshot(counters, 1, 10);
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["hits"], 1);
        assert_eq!(json["max_size"], 10);
        assert_eq!(json["hit_rate"], "100.00%");
    }
}
