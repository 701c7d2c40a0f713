//! Error types for the climate API
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Data Error ==
/// Failures raised by a data-access collaborator.
#[derive(Error, Debug)]
pub enum DataError {
    /// Index code outside the catalog allow-list
    #[error("Unknown climate index: {0}")]
    UnknownIndex(String),

    /// Scenario outside the catalog
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// Period outside the catalog
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// Backing store could not be reached or read
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

// == API Error ==
/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Nothing to return for this request
    #[error("Not found: {0}")]
    NotFound(String),

    /// Data source failure
    #[error(transparent)]
    Data(DataError),
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::UnknownIndex(_)
            | DataError::UnknownScenario(_)
            | DataError::UnknownPeriod(_) => ApiError::InvalidRequest(err.to_string()),
            other => ApiError::Data(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Warm Error ==
/// Unrecoverable cache warm-up failure; aborts startup.
#[derive(Error, Debug)]
pub enum WarmError {
    /// Scenario or period not in the catalog
    #[error("Invalid warm-up settings: {0}")]
    Settings(#[source] DataError),

    /// Metadata could not be fetched at all
    #[error("Metadata warm-up failed for {route}: {source}")]
    Metadata {
        route: &'static str,
        #[source]
        source: DataError,
    },

    /// Metadata fetched but could not be serialized
    #[error("Failed to serialize {route}: {source}")]
    Serialize {
        route: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (ApiError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("none".to_string()), StatusCode::NOT_FOUND),
            (
                ApiError::Data(DataError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unknown_codes_map_to_bad_request() {
        let err: ApiError = DataError::UnknownIndex("DROP TABLE".to_string()).into();
        assert!(matches!(err, ApiError::InvalidRequest(_)));

        let err: ApiError = DataError::Unavailable("db".to_string()).into();
        assert!(matches!(err, ApiError::Data(_)));
    }

    #[tokio::test]
    async fn test_error_body_format() {
        let response = ApiError::NotFound("No data for HD35".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Not found: No data for HD35");
    }
}
