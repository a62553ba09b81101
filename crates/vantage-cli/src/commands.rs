//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vantage", about = "Run declarative end-to-end browser scenarios")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "VANTAGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run fixtures against a browser
    Run(RunArgs),

    /// List fixtures and their tests
    List {
        /// Scenario directory (defaults to `scenarios/` at the workspace root)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write the effective configuration to the default config path
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Scenario directory (defaults to `scenarios/` at the workspace root)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Only run the fixture with this name
    #[arg(long, short = 'f')]
    pub fixture: Option<String>,

    /// Only run the test with this name
    #[arg(long, short = 't')]
    pub test: Option<String>,

    /// Replace the origin of every fixture page
    #[arg(long)]
    pub base_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Save a screenshot of every failed test into this directory
    #[arg(long)]
    pub screenshots: Option<PathBuf>,

    /// Skip remaining tests after the first failure
    #[arg(long)]
    pub stop_on_first_failure: bool,

    /// Element lookup timeout in milliseconds
    #[arg(long)]
    pub selector_timeout: Option<u64>,

    /// Assertion timeout in milliseconds
    #[arg(long)]
    pub assertion_timeout: Option<u64>,
}
