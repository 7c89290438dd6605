//! Where registry datasets come from.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use esd_core::dataset::Dataset;

use crate::error::{RegistryError, Result};
use crate::loader::parse_datasets;

/// Embedded placeholder datasets shown before any model data exists.
pub const SAMPLE_DATASETS: &str = include_str!("../../fixtures/sample_datasets.json");

/// A provider of node datasets.
pub trait DataSource {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Load every dataset this source provides, keyed by node id.
    fn load(&self) -> Result<BTreeMap<String, Dataset>>;
}

/// The embedded sample datasets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl DataSource for SampleSource {
    fn name(&self) -> &str {
        "sample datasets"
    }

    fn load(&self) -> Result<BTreeMap<String, Dataset>> {
        parse_datasets(self.name(), SAMPLE_DATASETS)
    }
}

/// Datasets read from a JSON file in the sample format.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<BTreeMap<String, Dataset>> {
        let text = fs::read_to_string(&self.path).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_datasets(&self.name, &text)
    }
}
