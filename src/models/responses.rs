//! Response DTOs for the climate API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Envelope for list endpoints: `{ success, count, data }`.
///
/// The cache warmer serializes the same type, so warmed and live bodies are
/// byte-identical.
#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for POST /api/cache/clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            success: true,
            message: format!("Cache cleared ({} entries removed)", removed),
        }
    }
}
