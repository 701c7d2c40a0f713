//! Response cache middleware.
//!
//! Serves cached GET responses, answers conditional requests with 304, and
//! captures successful handler output on a miss.

use axum::{
    body::{Body, HttpBody},
    extract::{Request, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH},
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument, warn};

use super::{
    keys::{is_admin_path, request_key},
    CacheEntry, SharedCache, TtlTier,
};
use crate::config::Config;

/// Header carrying `HIT` or `MISS`.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Largest body buffered on a miss unless configured otherwise.
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

// == Cache Policy ==
/// Feature toggles for the cache layer.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// When false, requests bypass the cache entirely.
    pub enabled: bool,
    /// Tiered TTLs plus ETag and conditional-request support. When false,
    /// every path uses the default tier and no ETag is emitted.
    pub tiered: bool,
    /// Upper bound on a buffered response body.
    pub max_body_bytes: usize,
}

impl CachePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.cache_enabled,
            tiered: config.cache_tiered,
            max_body_bytes: config.cache_max_body_bytes,
        }
    }

    /// Tier in effect for a path under this policy.
    pub fn tier_for(&self, path: &str) -> TtlTier {
        if self.tiered {
            TtlTier::for_path(path)
        } else {
            TtlTier::Default
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            tiered: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Shared state for the middleware.
#[derive(Clone)]
pub struct CacheLayerState {
    pub cache: SharedCache,
    pub policy: CachePolicy,
}

#[derive(Debug, Clone, Copy)]
enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    fn as_header(self) -> HeaderValue {
        match self {
            Self::Hit => HeaderValue::from_static("HIT"),
            Self::Miss => HeaderValue::from_static("MISS"),
        }
    }
}

/// Middleware for response caching.
///
/// Only GET requests outside the cache admin endpoints are eligible, and only
/// 200 responses are stored. Handler failures pass through untouched.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(layer): State<CacheLayerState>,
    request: Request,
    next: Next,
) -> Response {
    if !layer.policy.enabled
        || request.method() != Method::GET
        || is_admin_path(request.uri().path())
    {
        return next.run(request).await;
    }

    let key = request_key(request.method(), request.uri());
    let tier = layer.policy.tier_for(request.uri().path());

    let cached = layer.cache.write().await.lookup(&key);

    if let Some(entry) = cached {
        let validator = request
            .headers()
            .get(IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok());

        if layer.policy.tiered && validator == Some(entry.fingerprint.as_str()) {
            debug!(cache = "response", outcome = "not_modified", tier = tier.name());
            return not_modified(&entry, tier);
        }

        debug!(cache = "response", outcome = "hit", tier = tier.name());
        return cached_response(entry, tier, layer.policy.tiered);
    }

    debug!(
        cache = "response",
        outcome = "miss",
        tier = tier.name(),
        "cache miss, executing handler"
    );

    let mut response = next.run(request).await;

    if response.status() != StatusCode::OK {
        set_freshness(response.headers_mut(), tier, CacheStatus::Miss);
        return response;
    }

    let within_limit = response
        .body()
        .size_hint()
        .upper()
        .is_some_and(|n| n <= layer.policy.max_body_bytes as u64);
    if !within_limit {
        debug!(cache = "response", "body too large or unbounded, not caching");
        set_freshness(response.headers_mut(), tier, CacheStatus::Miss);
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, layer.policy.max_body_bytes).await {
        Ok(b) => b,
        Err(e) => {
            warn!(error = %e, "failed to buffer response body, not caching");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let entry = CacheEntry::new(key, bytes.clone(), tier.ttl());
    if layer.policy.tiered {
        set_etag(&mut parts.headers, &entry.fingerprint);
    }
    set_freshness(&mut parts.headers, tier, CacheStatus::Miss);

    debug!(cache = "response", bytes = bytes.len(), "caching response");
    layer.cache.write().await.insert(entry);

    Response::from_parts(parts, Body::from(bytes))
}

/// 304 for a matching validator: no body, freshness headers only.
fn not_modified(entry: &CacheEntry, tier: TtlTier) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    set_etag(headers, &entry.fingerprint);
    set_freshness(headers, tier, CacheStatus::Hit);
    response
}

/// Stored payload served verbatim.
fn cached_response(entry: CacheEntry, tier: TtlTier, with_etag: bool) -> Response {
    let mut response = Response::new(Body::from(entry.payload));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if with_etag {
        set_etag(headers, &entry.fingerprint);
    }
    set_freshness(headers, tier, CacheStatus::Hit);
    response
}

fn set_etag(headers: &mut HeaderMap, fingerprint: &str) {
    if let Ok(value) = HeaderValue::from_str(fingerprint) {
        headers.insert(ETAG, value);
    }
}

fn set_freshness(headers: &mut HeaderMap, tier: TtlTier, status: CacheStatus) {
    if let Ok(value) = HeaderValue::from_str(&tier.cache_control()) {
        headers.insert(CACHE_CONTROL, value);
    }
    headers.insert(X_CACHE, status.as_header());
}
