//! Command implementations for the energy scenario dashboard CLI.
//!
//! Provides subcommands for aggregating model output into national totals,
//! browsing and rendering datasets, exporting results and running the
//! model conversion script.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use esd_core::chart_type::ChartType;
use esd_core::context::Scenario;
use esd_core::technology::TechParameter;
use esd_registry::Section;

pub mod aggregate;
pub mod config;
pub mod export;
pub mod model;
pub mod show;

use config::{OutputFormat, DEFAULT_DATA_DIR, DEFAULT_MODEL_SCRIPT, DEFAULT_PROVINCE, DEFAULT_PYTHON, DEFAULT_SCENARIO};

/// Node selection shared by `show` and `chart`.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Navigation node id, e.g. `gdp`, `ECHPCOA` or `emissions-total`
    pub node: String,

    /// Technology parameter tab (EFF, AF, LIFETIME, NCAP_COST, NCAP_FOM, ACT_COST)
    #[arg(short, long)]
    pub parameter: Option<TechParameter>,

    /// Province id or model code (`beijing`, `BEIJ`, `nation`)
    #[arg(long, default_value = DEFAULT_PROVINCE)]
    pub province: String,

    #[arg(long, default_value = DEFAULT_SCENARIO)]
    pub scenario: Scenario,

    /// Also load model result datasets from the data directory
    #[arg(long)]
    pub results: bool,

    /// Dataset file overriding the built-in sample datasets
    #[arg(long)]
    pub datasets: Option<PathBuf>,

    /// Directory holding the model category files
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sum every province of each category file into nation.json
    Aggregate {
        /// Directory holding the category files
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Output path (defaults to <data-dir>/nation.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Comma-separated category files to aggregate instead of the standard nine
        #[arg(long, value_delimiter = ',')]
        files: Vec<String>,
    },

    /// List the navigation tree
    Nodes {
        /// Only list one section
        #[arg(short, long)]
        section: Option<Section>,

        /// Only list leaves that have no dataset
        #[arg(long)]
        unresolved: bool,
    },

    /// Print the table of a node
    Show {
        #[command(flatten)]
        view: ViewArgs,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the chart data of a node as JSON
    Chart {
        #[command(flatten)]
        view: ViewArgs,

        /// Chart type (defaults to the dataset's own)
        #[arg(short = 't', long)]
        chart_type: Option<ChartType>,
    },

    /// Write one CSV per category from nation.json
    Export {
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Directory for the CSV files (defaults to the data directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Copy a result workbook out of the data directory
    Artifact {
        /// nation_results.xlsx or 30PE_Results_ALL.xlsx
        name: String,

        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Destination file or directory
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },

    /// Run the model conversion script
    RunModel {
        #[arg(long, default_value = DEFAULT_MODEL_SCRIPT)]
        script: PathBuf,

        #[arg(long, default_value = DEFAULT_PYTHON)]
        python: String,

        /// Aggregate national totals after a successful run
        #[arg(long)]
        aggregate: bool,

        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Aggregate {
            data_dir,
            output,
            files,
        } => aggregate::run_aggregate(&data_dir, output.as_deref(), &files),
        Command::Nodes {
            section,
            unresolved,
        } => show::run_nodes(section, unresolved),
        Command::Show { view, format } => show::run_show(&view, format),
        Command::Chart { view, chart_type } => show::run_chart(&view, chart_type),
        Command::Export {
            data_dir,
            output_dir,
        } => {
            let output_dir = output_dir.unwrap_or_else(|| data_dir.clone());
            export::run_export(&data_dir, &output_dir)
        }
        Command::Artifact {
            name,
            data_dir,
            dest,
        } => export::run_artifact(&data_dir, &name, &dest),
        Command::RunModel {
            script,
            python,
            aggregate,
            data_dir,
        } => model::run_model(&python, &script, aggregate.then_some(data_dir.as_path())).await,
    }
}
