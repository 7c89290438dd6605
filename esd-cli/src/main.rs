//! `esd-cli`: folds provincial model output into national totals and prints
//! the dashboard's datasets, charts and technology projections.
//!
//! Set `RUST_LOG=info` (or `debug`) to see which category files were read
//! and which nodes had no data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "esd-cli",
    version,
    about = "Aggregate provincial energy scenario results and browse dashboard datasets",
    long_about = "Aggregate provincial energy scenario results into nation.json, export them \
                  as CSV, and render navigation nodes as tables or chart data."
)]
struct Cli {
    #[command(subcommand)]
    command: esd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("esd-cli {}", env!("CARGO_PKG_VERSION"));
    esd_cmd::run(cli.command).await
}
