//! CSV export of national totals and result workbook copies.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use esd_core::category::{Category, CombinedDocument};
use esd_data::OUTPUT_FILE_NAME;
use log::info;

use crate::config::{is_allowed_artifact, ARTIFACTS};

/// Chinese title of a category key, or the key itself when it is not one of
/// the standard nine.
pub fn category_label(key: &str) -> &str {
    key.parse::<Category>().map(|c| c.label()).unwrap_or(key)
}

/// Write `nation_<category>.csv` for every category of the document.
///
/// Columns are `subcategory` followed by every year seen in the category;
/// a sub-category without a value for some year leaves that cell empty.
pub fn export_csv(document: &CombinedDocument, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let mut written = Vec::new();
    for (category, table) in &document.nation {
        let years: BTreeSet<&str> = table
            .values()
            .flat_map(|series| series.keys().map(String::as_str))
            .collect();

        let path = output_dir.join(format!("nation_{}.csv", category));
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut header = vec!["subcategory"];
        header.extend(years.iter().copied());
        wtr.write_record(&header)?;

        for (subcategory, series) in table {
            let mut record = vec![subcategory.clone()];
            record.extend(
                years
                    .iter()
                    .map(|year| series.get(*year).map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;

        info!(
            "Exported {} {} ({} rows)",
            category_label(category),
            path.display(),
            table.len()
        );
        written.push(path);
    }
    Ok(written)
}

pub fn run_export(data_dir: &Path, output_dir: &Path) -> anyhow::Result<()> {
    let path = data_dir.join(OUTPUT_FILE_NAME);
    let text = fs::read_to_string(&path).with_context(|| {
        format!("Failed to read {} (run `aggregate` first)", path.display())
    })?;
    let document: CombinedDocument = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for (category, written) in document.nation.keys().zip(export_csv(&document, output_dir)?) {
        println!("{}\t{}", category_label(category), written.display());
    }
    Ok(())
}

/// Copy an allow-listed artifact from `data_dir` to `dest`.
///
/// `dest` may be a directory, in which case the artifact keeps its name.
/// Names outside the allow-list are rejected before any file is touched.
pub fn copy_artifact(data_dir: &Path, name: &str, dest: &Path) -> anyhow::Result<PathBuf> {
    if !is_allowed_artifact(name) {
        bail!(
            "Invalid artifact name: {} (expected one of {})",
            name,
            ARTIFACTS.join(", ")
        );
    }

    let source = data_dir.join(name);
    let is_file = fs::metadata(&source)
        .with_context(|| format!("Artifact not found: {}", source.display()))?
        .is_file();
    if !is_file {
        bail!("Not a file: {}", source.display());
    }

    let target = if dest.is_dir() {
        dest.join(name)
    } else {
        dest.to_path_buf()
    };
    let bytes = fs::copy(&source, &target)
        .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
    info!("Copied {} ({} bytes) to {}", name, bytes, target.display());
    Ok(target)
}

pub fn run_artifact(data_dir: &Path, name: &str, dest: &Path) -> anyhow::Result<()> {
    let target = copy_artifact(data_dir, name, dest)?;
    println!("{}", target.display());
    Ok(())
}
