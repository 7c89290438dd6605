//! Defaults shared by the subcommands.

use clap::ValueEnum;

/// Directory holding the model's category files and `nation.json`.
pub const DEFAULT_DATA_DIR: &str = "data/excel/json";

/// Conversion script that turns the model workbooks into category files.
pub const DEFAULT_MODEL_SCRIPT: &str = "data/excel/json/result_excel_to_json.py";

pub const DEFAULT_PYTHON: &str = "python3";

pub const DEFAULT_PROVINCE: &str = "beijing";

pub const DEFAULT_SCENARIO: &str = "cn60";

/// Files that may be copied out of the data directory.
pub const ARTIFACTS: [&str; 2] = ["nation_results.xlsx", "30PE_Results_ALL.xlsx"];

pub fn is_allowed_artifact(name: &str) -> bool {
    ARTIFACTS.contains(&name)
}

/// How `show` prints a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}
