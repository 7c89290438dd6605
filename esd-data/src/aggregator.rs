//! Whole-directory aggregation run.

use crate::error::{AggregateError, Result};
use crate::national::{round_table, sum_emissions, sum_provinces};
use esd_core::category::{category_key, Category, CombinedDocument, SubcategoryTable};
use esd_utils::json::to_pretty_vec;
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the combined output written next to the category files.
pub const OUTPUT_FILE_NAME: &str = "nation.json";

/// Decimal places kept in the combined output.
pub const OUTPUT_DECIMALS: u32 = 1;

/// National totals of one run plus the category files that were absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub document: CombinedDocument,
    pub missing: Vec<String>,
}

/// What a completed run wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub output_path: PathBuf,
    /// Category keys present in the output, in file-list order
    pub categories: Vec<String>,
    /// Category files that did not exist and were skipped
    pub skipped: Vec<String>,
}

/// Aggregates the category files of one data directory into `nation.json`.
#[derive(Debug, Clone)]
pub struct Aggregator {
    data_dir: PathBuf,
    files: Vec<String>,
    output_path: PathBuf,
}

impl Aggregator {
    /// Aggregator over the nine standard category files of `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let output_path = data_dir.join(OUTPUT_FILE_NAME);
        Self {
            data_dir,
            files: Category::default_file_names(),
            output_path,
        }
    }

    /// Replace the list of category file names.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Write the output somewhere other than `<data_dir>/nation.json`.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Compute the national totals without writing anything.
    ///
    /// Missing files are logged and skipped. A file that cannot be read or
    /// parsed aborts the whole run.
    pub fn aggregate(&self) -> Result<Aggregation> {
        let mut aggregation = Aggregation::default();

        for file in &self.files {
            let path = self.data_dir.join(file);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("Category file not found, skipping: {}", path.display());
                    aggregation.missing.push(file.clone());
                    continue;
                }
                Err(source) => return Err(AggregateError::Read { path, source }),
            };

            let key = category_key(file);
            let mut totals = aggregate_text(file, key, &text)?;
            check_finite(file, &totals)?;
            round_table(&mut totals, OUTPUT_DECIMALS);
            debug!("Aggregated {} ({} sub-categories)", file, totals.len());
            aggregation.document.nation.insert(key.to_string(), totals);
        }

        Ok(aggregation)
    }

    /// Aggregate and write the combined document.
    ///
    /// Nothing is written unless every present file was aggregated.
    pub fn run(&self) -> Result<AggregateSummary> {
        let Aggregation { document, missing } = self.aggregate()?;
        let bytes = to_pretty_vec(&document)?;

        fs::write(&self.output_path, bytes).map_err(|source| AggregateError::Write {
            path: self.output_path.clone(),
            source,
        })?;

        let categories: Vec<String> = self
            .files
            .iter()
            .map(|f| category_key(f).to_string())
            .filter(|k| document.nation.contains_key(k))
            .collect();
        info!(
            "Wrote national totals for {} categories to {}",
            categories.len(),
            self.output_path.display()
        );

        Ok(AggregateSummary {
            output_path: self.output_path.clone(),
            categories,
            skipped: missing,
        })
    }
}

/// Parse one category file and fold its provinces.
fn aggregate_text(file: &str, key: &str, text: &str) -> Result<SubcategoryTable> {
    let value: Value = serde_json::from_str(text).map_err(|source| AggregateError::Malformed {
        file: file.to_string(),
        source,
    })?;
    let provinces = value.as_object().ok_or_else(|| AggregateError::NotAnObject {
        file: file.to_string(),
    })?;

    if key == Category::Emissions.key() {
        Ok(sum_emissions(provinces))
    } else {
        Ok(sum_provinces(provinces))
    }
}

/// JSON has no representation for infinities or NaN.
fn check_finite(file: &str, totals: &SubcategoryTable) -> Result<()> {
    for (subcategory, series) in totals {
        if let Some((year, _)) = series.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AggregateError::NonFinite {
                file: file.to_string(),
                subcategory: subcategory.clone(),
                year: year.clone(),
            });
        }
    }
    Ok(())
}
