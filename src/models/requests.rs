//! Request DTOs for the climate API
//!
//! Path parameters of incoming requests.

use serde::Deserialize;

use crate::data::catalog::{validate_index_code, validate_period, validate_scenario};
use crate::error::DataError;

/// Path parameters of `GET /api/climate-data/geojson/:scenario/:period/:index`
#[derive(Debug, Clone, Deserialize)]
pub struct GeoJsonParams {
    pub scenario: String,
    pub period: String,
    pub index: String,
}

impl GeoJsonParams {
    /// Checks every parameter against the catalog.
    pub fn validate(&self) -> Result<(), DataError> {
        validate_scenario(&self.scenario)?;
        validate_period(&self.period)?;
        validate_index_code(&self.index)?;
        Ok(())
    }
}
