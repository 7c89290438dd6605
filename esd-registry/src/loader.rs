//! Parsing of dataset records into registry entries.
//!
//! # Record format
//!
//! A dataset file is a JSON object keyed by node id. Each record has a
//! `title`, an optional `default_chart_type` and exactly one of:
//!
//! - `rows`: literal indicator rows
//! - `technology`: the six base parameters of a technology
//!
//! ```text
//! { "gdp":     { "title": "GDP", "rows": [ { "indicator": "GDP", "unit": "十亿元", "values": { "2025": 4500 } } ] },
//!   "ECHPCOA": { "title": "ECHPCOA (煤基联合供热发电)", "technology": { "efficiency": 42, ... } } }
//! ```

use std::collections::BTreeMap;

use esd_core::chart_type::ChartType;
use esd_core::dataset::Dataset;
use esd_core::indicator::IndicatorRow;
use esd_core::technology::BaseParams;
use serde::Deserialize;

use crate::error::{RegistryError, Result};

/// One dataset as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRecord {
    pub title: String,
    #[serde(default)]
    pub default_chart_type: Option<ChartType>,
    #[serde(default)]
    pub rows: Option<Vec<IndicatorRow>>,
    #[serde(default)]
    pub technology: Option<BaseParams>,
}

impl DatasetRecord {
    /// Convert into a dataset. A technology's code is its node id.
    pub fn into_dataset(self, id: &str) -> Result<Dataset> {
        let dataset = match (self.rows, self.technology) {
            (Some(rows), None) => {
                if !rows.iter().all(IndicatorRow::covers_platform_years) {
                    log::debug!("[ESD] loader: {} has rows outside the platform years", id);
                }
                Dataset::literal(self.title, rows)
            }
            (None, Some(base)) => Dataset::technology(self.title, id, base),
            (Some(_), Some(_)) => {
                return Err(RegistryError::InvalidRecord {
                    id: id.to_string(),
                    reason: "has both rows and technology parameters".to_string(),
                })
            }
            (None, None) => {
                return Err(RegistryError::InvalidRecord {
                    id: id.to_string(),
                    reason: "has neither rows nor technology parameters".to_string(),
                })
            }
        };
        Ok(match self.default_chart_type {
            Some(chart_type) => dataset.with_chart_type(chart_type),
            None => dataset,
        })
    }
}

/// Parse a dataset file. `origin` names the file in error messages.
pub fn parse_datasets(origin: &str, json: &str) -> Result<BTreeMap<String, Dataset>> {
    let records: BTreeMap<String, DatasetRecord> =
        serde_json::from_str(json).map_err(|source| RegistryError::Parse {
            origin: origin.to_string(),
            source,
        })?;

    let mut datasets = BTreeMap::new();
    for (id, record) in records {
        let dataset = record.into_dataset(&id)?;
        datasets.insert(id, dataset);
    }
    log::debug!("[ESD] loader: Parsed {} records from {}", datasets.len(), origin);
    Ok(datasets)
}
