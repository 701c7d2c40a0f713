//! In-memory data source loaded from a JSON dataset file.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::{validate_index_code, validate_period, validate_scenario};
use super::{
    ClimateDataSource, Feature, FeatureCollection, FeatureProperties, IndexMetadata, Municipality,
};
use crate::error::DataError;

/// One projected index value for a municipality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexValue {
    pub municipality_code: String,
    pub scenario: String,
    pub period: String,
    pub index_code: String,
    pub value: f64,
}

/// Dataset file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub indices: Vec<IndexMetadata>,
    #[serde(default)]
    pub municipalities: Vec<Municipality>,
    /// Municipality code to GeoJSON geometry
    #[serde(default)]
    pub geometries: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub values: Vec<IndexValue>,
}

/// Data source answering from a dataset held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    dataset: Dataset,
}

impl InMemoryDataSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads and parses a dataset file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let source = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            indices = source.dataset.indices.len(),
            municipalities = source.dataset.municipalities.len(),
            values = source.dataset.values.len(),
            "Dataset loaded"
        );
        Ok(source)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl ClimateDataSource for InMemoryDataSource {
    async fn fetch_all_active_indices(&self) -> Result<Vec<IndexMetadata>, DataError> {
        Ok(self
            .dataset
            .indices
            .iter()
            .filter(|meta| meta.active)
            .cloned()
            .collect())
    }

    async fn fetch_all_municipalities(&self) -> Result<Vec<Municipality>, DataError> {
        Ok(self.dataset.municipalities.clone())
    }

    async fn fetch_geojson(
        &self,
        scenario: &str,
        period: &str,
        index_code: &str,
    ) -> Result<Option<FeatureCollection>, DataError> {
        let scenario = validate_scenario(scenario)?;
        let period = validate_period(period)?;
        let index_code = validate_index_code(index_code)?;

        let features: Vec<Feature> = self
            .dataset
            .municipalities
            .iter()
            .filter_map(|m| {
                let value = self.dataset.values.iter().find(|v| {
                    v.municipality_code == m.code
                        && v.scenario == scenario
                        && v.period == period
                        && v.index_code == index_code
                })?;

                Some(Feature {
                    kind: "Feature".to_string(),
                    geometry: self
                        .dataset
                        .geometries
                        .get(&m.code)
                        .cloned()
                        .unwrap_or(serde_json::Value::Null),
                    properties: FeatureProperties {
                        municipality_code: m.code.clone(),
                        municipality_name: m.name.clone(),
                        province: m.province.clone(),
                        scenario: scenario.to_string(),
                        period: period.to_string(),
                        index_code: index_code.to_string(),
                        value: value.value,
                    },
                })
            })
            .collect();

        if features.is_empty() {
            Ok(None)
        } else {
            Ok(Some(FeatureCollection::new(features)))
        }
    }
}
