//! Tether Runtime
//!
//! Boots a bridge with the demo host functions and runs the smoke checks

mod checks;
mod host_functions;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tether_script::Bridge;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tether", version, about = "Run cross-runtime call smoke checks")]
struct Cli {
    /// Suite file (JSON) with bridge settings and checks
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra directory to search for the script module
    #[arg(short, long)]
    scripts: Vec<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    tracing::info!("Tether v{}", tether_core::VERSION);

    let mut suite = match &cli.config {
        Some(path) => checks::Suite::load(path)?,
        None => checks::Suite::default(),
    };
    suite.bridge.search_paths.extend(cli.scripts);

    let bridge = Bridge::builder(suite.bridge.clone())
        .with_registry(host_functions::registry()?)
        .build()?;

    let report = checks::run(&bridge, &suite.checks);
    tracing::info!(passed = report.passed, failed = report.failed, "smoke checks finished");

    if report.failed > 0 {
        anyhow::bail!(
            "{} of {} checks failed",
            report.failed,
            report.passed + report.failed
        );
    }
    Ok(())
}
