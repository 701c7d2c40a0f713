//! Cache keys and route paths shared by the middleware and the warmer.

use axum::http::{Method, Uri};

/// Administrative prefix; requests under it are never cached.
pub const ADMIN_PREFIX: &str = "/api/cache";

pub const INDICES_PATH: &str = "/api/indices";
pub const MUNICIPALITIES_PATH: &str = "/api/municipalities";

/// Builds the cache key `METHOD:path?query`.
pub fn cache_key(method: &Method, path_and_query: &str) -> String {
    format!("{}:{}", method, path_and_query)
}

/// Cache key for a request URI.
pub fn request_key(method: &Method, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    cache_key(method, path_and_query)
}

/// Path of the GeoJSON route for one scenario/period/index.
pub fn geojson_path(scenario: &str, period: &str, index_code: &str) -> String {
    format!("/api/climate-data/geojson/{scenario}/{period}/{index_code}")
}

/// Whether a path belongs to the cache administration endpoints.
pub fn is_admin_path(path: &str) -> bool {
    path.starts_with(ADMIN_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_method_and_query() {
        let uri: Uri = "/api/scenarios?lang=en".parse().unwrap();
        assert_eq!(request_key(&Method::GET, &uri), "GET:/api/scenarios?lang=en");
    }

    #[test]
    fn key_without_query() {
        let uri: Uri = "/api/indices".parse().unwrap();
        assert_eq!(request_key(&Method::GET, &uri), cache_key(&Method::GET, INDICES_PATH));
    }

    #[test]
    fn geojson_path_layout() {
        assert_eq!(
            geojson_path("ssp245", "near-term_2021-2040", "HD35"),
            "/api/climate-data/geojson/ssp245/near-term_2021-2040/HD35"
        );
    }

    #[test]
    fn admin_paths() {
        assert!(is_admin_path("/api/cache/stats"));
        assert!(is_admin_path("/api/cache/clear"));
        assert!(!is_admin_path("/api/indices"));
    }
}
