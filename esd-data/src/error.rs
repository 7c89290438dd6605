/// Error types for the aggregator
use std::path::PathBuf;
use thiserror::Error;

/// Failure of an aggregation run. Any of these aborts the run before the
/// output file is touched.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// Category file exists but could not be read
    #[error("Failed to read category file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Category file is not valid JSON
    #[error("Malformed category file {file}: {source}")]
    Malformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Category file is valid JSON but not an object keyed by province
    #[error("Malformed category file {file}: expected an object keyed by province")]
    NotAnObject { file: String },

    /// A national total overflowed or a leaf parsed to infinity
    #[error("Non-finite total in {file}: {subcategory} / {year}")]
    NonFinite {
        file: String,
        subcategory: String,
        year: String,
    },

    /// National totals could not be serialized
    #[error("Failed to serialize national totals: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Output file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Results using AggregateError
pub type Result<T> = std::result::Result<T, AggregateError>;
