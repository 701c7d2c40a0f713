//! TTL Tiers
//!
//! Maps request paths to freshness tiers by substring match.

use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Path markers, checked in this order; first match wins.
const INDICES_MARKER: &str = "/api/indices";
const GEOJSON_MARKER: &str = "/geojson";
const MUNICIPALITIES_MARKER: &str = "/municipalities";
const HEALTH_MARKER: &str = "/health";

// == TTL Tier ==
/// A named TTL bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlTier {
    IndicesMetadata,
    GeoJson,
    Municipalities,
    Health,
    Default,
}

impl TtlTier {
    /// Classifies a request path. Order matters: a GeoJSON route that also
    /// mentions municipalities stays in the GeoJSON tier.
    pub fn for_path(path: &str) -> Self {
        if path.contains(INDICES_MARKER) {
            Self::IndicesMetadata
        } else if path.contains(GEOJSON_MARKER) {
            Self::GeoJson
        } else if path.contains(MUNICIPALITIES_MARKER) {
            Self::Municipalities
        } else if path.contains(HEALTH_MARKER) {
            Self::Health
        } else {
            Self::Default
        }
    }

    pub fn ttl(self) -> Duration {
        match self {
            Self::IndicesMetadata => 7 * DAY,
            Self::GeoJson => 30 * DAY,
            Self::Municipalities => 7 * DAY,
            Self::Health => HOUR,
            Self::Default => HOUR,
        }
    }

    /// `max-age` in whole seconds (`floor(ttl_ms / 1000)`).
    pub fn max_age_secs(self) -> u64 {
        (self.ttl().as_millis() / 1000) as u64
    }

    /// Value for the `Cache-Control` header.
    pub fn cache_control(self) -> String {
        format!("public, max-age={}", self.max_age_secs())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::IndicesMetadata => "indices",
            Self::GeoJson => "geojson",
            Self::Municipalities => "municipalities",
            Self::Health => "health",
            Self::Default => "default",
        }
    }
}

/// Returns the TTL for a request path.
pub fn classify_ttl(path: &str) -> Duration {
    TtlTier::for_path(path).ttl()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_markers() {
        assert_eq!(TtlTier::for_path("/api/indices"), TtlTier::IndicesMetadata);
        assert_eq!(
            TtlTier::for_path("/api/climate-data/geojson/ssp245/near-term_2021-2040/HD35"),
            TtlTier::GeoJson
        );
        assert_eq!(TtlTier::for_path("/api/municipalities"), TtlTier::Municipalities);
        assert_eq!(TtlTier::for_path("/health"), TtlTier::Health);
        assert_eq!(TtlTier::for_path("/api/scenarios"), TtlTier::Default);
    }

    #[test]
    fn test_geojson_wins_over_municipalities() {
        let path = "/api/climate-data/geojson/municipalities/ssp245";
        assert_eq!(TtlTier::for_path(path), TtlTier::GeoJson);
        assert_eq!(classify_ttl(path), Duration::from_secs(30 * 24 * 3600));
    }

    #[test]
    fn test_indices_wins_over_everything() {
        assert_eq!(
            TtlTier::for_path("/api/indices/geojson/municipalities"),
            TtlTier::IndicesMetadata
        );
    }

    #[test]
    fn test_cache_control_values() {
        assert_eq!(TtlTier::IndicesMetadata.cache_control(), "public, max-age=604800");
        assert_eq!(TtlTier::GeoJson.cache_control(), "public, max-age=2592000");
        assert_eq!(TtlTier::Municipalities.cache_control(), "public, max-age=604800");
        assert_eq!(TtlTier::Health.cache_control(), "public, max-age=3600");
        assert_eq!(TtlTier::Default.cache_control(), "public, max-age=3600");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let path = "/api/climate-data/geojson/ssp585/long-term_2081-2100/CDD";
        assert_eq!(classify_ttl(path), classify_ttl(path));
    }
}
