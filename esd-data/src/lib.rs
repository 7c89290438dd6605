//! Aggregation of per-province category files into national totals.
//!
//! Each category file maps `province -> sub-category -> year -> value`.
//! [`national`] folds the provinces of one document into a single
//! sub-category table; [`aggregator::Aggregator`] runs that fold over the
//! fixed list of category files in a data directory and writes the
//! combined `nation.json`.

pub mod aggregator;
pub mod error;
pub mod national;

pub use aggregator::{AggregateSummary, Aggregator, OUTPUT_FILE_NAME};
pub use error::AggregateError;
