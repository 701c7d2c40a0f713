//! Cache Entry Module
//!
//! Defines a cached response payload with its fingerprint and expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use sha2::{Digest, Sha256};

// == Cache Entry ==
/// A cached response body with metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Request key (`METHOD:path?query`)
    pub key: String,
    /// Serialized JSON body, opaque to the cache
    pub payload: Bytes,
    /// Strong ETag of `payload`, already quoted
    pub fingerprint: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` after now.
    ///
    /// # Arguments
    /// * `key` - The request key
    /// * `payload` - The serialized response body
    /// * `ttl` - Time to live for this entry
    pub fn new(key: String, payload: Bytes, ttl: Duration) -> Self {
        let now = current_timestamp_ms();
        let fingerprint = fingerprint(&payload);

        Self {
            key,
            payload,
            fingerprint,
            created_at: now,
            expires_at: now.saturating_add(ttl.as_millis() as u64),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    /// Returns remaining TTL in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Fingerprint ==
/// Computes the strong ETag for a payload: the quoted hex SHA-256 digest.
pub fn fingerprint(payload: &[u8]) -> String {
    let digest = Sha256::digest(payload);
    format!("\"{}\"", hex::encode(digest))
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
