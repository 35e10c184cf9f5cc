use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod report;
mod snapshot;

use report::TargetReport;
use snapshot::Snapshot;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: target-inspect <snapshot.yaml>")
        .and_then(|path| run(&path));

    ExitCode::from(exit_status(&result))
}

/// Log a failed run once and map it to the process exit status
fn exit_status(result: &Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("Failed to resolve targets: {:#}", e);
            1
        }
    }
}

fn run(path: &Path) -> Result<()> {
    info!("Loading snapshot from {}", path.display());
    let snapshot = Snapshot::load(path)?;

    let target = snapshot.build()?;
    info!(
        "Resolved {} cluster gateway targets for {}",
        target.len(),
        target.name()
    );

    let report = TargetReport::from(&target);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
