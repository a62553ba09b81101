//! Vantage CLI - run declarative end-to-end browser scenarios.
//!
//! Loads fixtures from `scenarios/` (or the built-in set), drives Chrome
//! through each test in order and exits non-zero if any test fails.

mod cli;
mod commands;

use clap::Parser;
use commands::Cli;
use std::process::ExitCode;
use tracing::info;

/// Initialize tracing subscriber for logging. Logs go to stderr so that
/// `--json` output on stdout stays machine-readable.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vantage=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    info!("Starting Vantage v{}", env!("CARGO_PKG_VERSION"));

    match cli::dispatch(cli.config.as_deref(), cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
