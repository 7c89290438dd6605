//! Running the model conversion script.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use log::{info, warn};
use tokio::process::Command;

use crate::aggregate::run_aggregate;

/// Outcome of one script run.
#[derive(Debug, Clone)]
pub struct ModelRun {
    pub script: PathBuf,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub started: DateTime<Local>,
    pub finished: DateTime<Local>,
}

impl ModelRun {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.finished - self.started).num_milliseconds() as f64 / 1000.0
    }
}

/// Run `<interpreter> <script>` from the script's own directory and capture
/// its output. Fails only if the process could not be started.
pub async fn run_script(interpreter: &str, script: &Path) -> anyhow::Result<ModelRun> {
    let script = if script.is_absolute() {
        script.to_path_buf()
    } else {
        std::env::current_dir()?.join(script)
    };
    let workdir = script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let started = Local::now();
    info!("Executing script: {} {}", interpreter, script.display());
    info!("Working directory: {}", workdir.display());

    let output = Command::new(interpreter)
        .arg(&script)
        .current_dir(&workdir)
        .output()
        .await
        .with_context(|| format!("Failed to start {} {}", interpreter, script.display()))?;

    let run = ModelRun {
        script,
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        started,
        finished: Local::now(),
    };
    info!(
        "Script exited with code {:?} after {:.1}s",
        run.exit_code,
        run.elapsed_secs()
    );
    Ok(run)
}

/// Run the model script, then optionally aggregate `aggregate_dir`.
pub async fn run_model(
    interpreter: &str,
    script: &Path,
    aggregate_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let run = run_script(interpreter, script).await?;

    print!("{}", run.stdout);
    if !run.success() {
        eprint!("{}", run.stderr);
        match run.exit_code {
            Some(code) => bail!("Script failed with code {}.", code),
            None => bail!("Script was terminated by a signal."),
        }
    }
    if !run.stderr.is_empty() {
        warn!("Script wrote to stderr: {}", run.stderr.trim_end());
    }
    println!(
        "Model run successfully at {}.",
        run.finished.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(data_dir) = aggregate_dir {
        run_aggregate(data_dir, None, &[])?;
    }
    Ok(())
}
