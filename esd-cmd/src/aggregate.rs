//! National aggregation of the model category files.

use std::path::Path;

use anyhow::Context;
use esd_data::{AggregateSummary, Aggregator};
use log::info;

/// Aggregate `data_dir` into `nation.json` (or `output`).
///
/// An empty `files` list means the nine standard category files.
pub fn aggregate_dir(
    data_dir: &Path,
    output: Option<&Path>,
    files: &[String],
) -> anyhow::Result<AggregateSummary> {
    let mut aggregator = Aggregator::new(data_dir);
    if !files.is_empty() {
        aggregator = aggregator.with_files(files.iter().cloned());
    }
    if let Some(output) = output {
        aggregator = aggregator.with_output(output);
    }

    info!(
        "Aggregating {} category files in {}",
        aggregator.files().len(),
        data_dir.display()
    );
    aggregator
        .run()
        .with_context(|| format!("Aggregation failed in {}", data_dir.display()))
}

pub fn run_aggregate(data_dir: &Path, output: Option<&Path>, files: &[String]) -> anyhow::Result<()> {
    let summary = aggregate_dir(data_dir, output, files)?;

    println!(
        "Wrote {} ({} categories: {})",
        summary.output_path.display(),
        summary.categories.len(),
        summary.categories.join(", ")
    );
    if !summary.skipped.is_empty() {
        println!("Skipped missing files: {}", summary.skipped.join(", "));
    }
    Ok(())
}
