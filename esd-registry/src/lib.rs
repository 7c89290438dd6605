//! Immutable dataset registry for the energy scenario dashboard.
//!
//! The registry maps navigation node ids to [`Dataset`] descriptors. It is
//! built once from one or more [`DataSource`]s and never mutated afterwards;
//! user edits live in the presentation snapshot, not here.
//!
//! # Architecture
//!
//! - [`source`]: the `DataSource` trait plus the embedded sample data and
//!   JSON file sources
//! - [`results`]: model result datasets built from the category files
//! - [`navigation`]: the four section trees the node ids come from
//! - `loader` / `queries`: record parsing and lookups on [`Registry`]
//!
//! # Usage
//!
//! ```rust
//! use esd_registry::Registry;
//!
//! let registry = Registry::builtin().unwrap();
//! let dataset = registry.resolve("ECHPCOA").unwrap();
//! let row = esd_registry::project_technology_parameter(dataset, "EFF").unwrap();
//! assert_eq!(row.numeric("2030"), Some(44.1));
//!
//! assert!(registry.resolve("nonexistent-node").is_none());
//! ```

pub mod error;
mod loader;
pub mod navigation;
mod queries;
pub mod results;
pub mod source;

use std::collections::BTreeMap;
use std::sync::Arc;

use esd_core::dataset::Dataset;

pub use error::{RegistryError, ResolveError};
pub use loader::{parse_datasets, DatasetRecord};
pub use navigation::{NavigationTree, Section, TreeNode};
pub use queries::project_technology_parameter;
pub use results::ResultSource;
pub use source::{DataSource, JsonFileSource, SampleSource};

/// Node id to dataset, frozen at construction.
///
/// Cloning shares the underlying map, so a registry can be handed to any
/// number of threads.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    datasets: Arc<BTreeMap<String, Dataset>>,
}

impl Registry {
    pub fn new(datasets: BTreeMap<String, Dataset>) -> Self {
        Self {
            datasets: Arc::new(datasets),
        }
    }

    /// Build a registry from a single source.
    pub fn from_source(source: &dyn DataSource) -> error::Result<Self> {
        Self::from_sources(&[source])
    }

    /// Build a registry from several sources. A node id defined by a later
    /// source replaces the earlier definition.
    pub fn from_sources(sources: &[&dyn DataSource]) -> error::Result<Self> {
        let mut datasets = BTreeMap::new();
        for source in sources {
            let loaded = source.load()?;
            log::info!(
                "[ESD] registry: Loaded {} datasets from {}",
                loaded.len(),
                source.name()
            );
            for (id, dataset) in loaded {
                if datasets.insert(id.clone(), dataset).is_some() {
                    log::debug!("[ESD] registry: {} overrides node {}", source.name(), id);
                }
            }
        }
        Ok(Self::new(datasets))
    }

    /// Registry over the embedded sample datasets.
    pub fn builtin() -> error::Result<Self> {
        Self::from_source(&SampleSource)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Every registered node id, sorted.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}
