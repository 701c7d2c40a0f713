//! Data access
//!
//! The port the handlers and the cache warmer read through, the records it
//! returns, and an in-memory implementation backed by a JSON dataset.

pub mod catalog;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

pub use memory::{Dataset, IndexValue, InMemoryDataSource};

/// Climate index metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Municipality summary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    pub code: String,
    pub name: String,
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

/// One municipality's value for an index, with its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: serde_json::Value,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub municipality_code: String,
    pub municipality_name: String,
    pub province: String,
    pub scenario: String,
    pub period: String,
    pub index_code: String,
    pub value: f64,
}

/// GeoJSON feature collection for one scenario/period/index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// == Data Source Port ==
/// Read access to climate data.
#[async_trait]
pub trait ClimateDataSource: Send + Sync {
    /// All index metadata records marked active.
    async fn fetch_all_active_indices(&self) -> Result<Vec<IndexMetadata>, DataError>;

    /// All municipality summaries.
    async fn fetch_all_municipalities(&self) -> Result<Vec<Municipality>, DataError>;

    /// Feature collection for one combination, `None` when there is no data.
    ///
    /// Implementations must reject codes outside [`catalog`].
    async fn fetch_geojson(
        &self,
        scenario: &str,
        period: &str,
        index_code: &str,
    ) -> Result<Option<FeatureCollection>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_collection_serializes_as_geojson() {
        let fc = FeatureCollection::new(vec![Feature {
            kind: "Feature".to_string(),
            geometry: serde_json::json!({ "type": "Point", "coordinates": [28.0, -26.2] }),
            properties: FeatureProperties {
                municipality_code: "JHB".to_string(),
                municipality_name: "City of Johannesburg".to_string(),
                province: "Gauteng".to_string(),
                scenario: "ssp245".to_string(),
                period: "near-term_2021-2040".to_string(),
                index_code: "HD35".to_string(),
                value: 12.5,
            },
        }]);

        let json = serde_json::to_value(&fc).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["properties"]["value"], 12.5);
    }

    #[test]
    fn index_metadata_defaults_to_active() {
        let meta: IndexMetadata =
            serde_json::from_str(r#"{"code":"CDD","name":"Consecutive dry days"}"#).unwrap();
        assert!(meta.active);
        assert!(meta.unit.is_empty());
    }
}
