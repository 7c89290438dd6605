//! Error types for loading and querying the registry.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while building a registry from a data source.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Record that is neither a literal nor a technology dataset
    #[error("Invalid dataset record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}

/// Invalid argument to a projection. Distinct from a node that does not exist,
/// which resolves to `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Dataset '{0}' is not a technology dataset")]
    NotTechnology(String),

    #[error("Unknown technology parameter: {0} (expected EFF, AF, LIFETIME, NCAP_COST, NCAP_FOM or ACT_COST)")]
    UnknownParameter(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
