//! Command implementations.

use crate::commands::{Commands, RunArgs};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use vantage_browser::BrowserEngine;
use vantage_core::AppConfig;
use vantage_scenario::{
    builtin, Fixture, RunFilter, RunOptions, ScenarioError, ScenarioLoader, ScenarioRunner,
};

/// Execute a command. Returns `false` when a run finished with failures.
pub async fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<bool> {
    let mut config = load_config(config_path)?;

    match command {
        Commands::Run(args) => {
            apply_run_args(&mut config, &args);
            config.validate()?;
            run(&config, &args).await
        }
        Commands::List { dir } => {
            let fixtures = load_fixtures(dir.as_deref())?;
            print!("{}", render_list(&fixtures));
            Ok(true)
        }
        Commands::Config { init } => {
            if init {
                config.save()?;
                println!("wrote {}", AppConfig::config_path()?.display());
            } else {
                print!("{}", config.to_toml()?);
            }
            Ok(true)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = path else {
        return AppConfig::load_with_env().context("loading config");
    };

    let mut config = AppConfig::load_from(path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Command-line flags take precedence over file and environment settings.
fn apply_run_args(config: &mut AppConfig, args: &RunArgs) {
    if args.headed {
        config.browser.headless = false;
    }
    if let Some(base_url) = &args.base_url {
        config.runner.base_url = Some(base_url.clone());
    }
    if let Some(ms) = args.selector_timeout {
        config.runner.selector_timeout_ms = ms;
    }
    if let Some(ms) = args.assertion_timeout {
        config.runner.assertion_timeout_ms = ms;
    }
    if args.stop_on_first_failure {
        config.runner.stop_on_first_failure = true;
    }
    if let Some(dir) = &args.screenshots {
        config.report.screenshots_dir = Some(dir.clone());
    }
    if args.json {
        config.report.json = true;
    }
}

/// Load fixtures from `dir`, or from the default directory, falling back to
/// the built-in fixtures when no scenario directory exists.
fn load_fixtures(dir: Option<&Path>) -> Result<Vec<Fixture>> {
    let loader = match dir {
        Some(dir) => ScenarioLoader::new(dir)?,
        None => match ScenarioLoader::with_default_dir() {
            Ok(loader) => loader,
            Err(ScenarioError::DirectoryNotFound { path }) => {
                info!(path = %path, "no scenario directory, using built-in fixtures");
                return Ok(builtin::all()?);
            }
            Err(e) => return Err(e.into()),
        },
    };

    let fixtures = loader.load_all()?;
    if fixtures.is_empty() {
        warn!(dir = %loader.dir().display(), "no fixtures found");
    }
    Ok(fixtures)
}

async fn run(config: &AppConfig, args: &RunArgs) -> Result<bool> {
    let fixtures = load_fixtures(args.dir.as_deref())?;
    let filter = RunFilter {
        fixture: args.fixture.clone(),
        test: args.test.clone(),
    };

    let engine = BrowserEngine::launch(&config.browser)
        .await
        .context("launching browser")?
        .with_poll_interval(Duration::from_millis(config.runner.poll_interval_ms));

    let result = ScenarioRunner::new(&engine, RunOptions::from_config(config))
        .run(&fixtures, &filter)
        .await;

    if let Err(e) = engine.close().await {
        warn!(error = %e, "failed to close browser");
    }

    let report = result?;
    if config.report.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(report.is_success())
}

fn render_list(fixtures: &[Fixture]) -> String {
    let mut out = String::new();
    for fixture in fixtures {
        let _ = writeln!(out, "{} ({})", fixture.name(), fixture.page());
        if let Some(description) = &fixture.meta.description {
            let _ = writeln!(out, "  {description}");
        }
        for test in &fixture.tests {
            let _ = writeln!(out, "  - {} [{} steps]", test.name, test.steps.len());
        }
    }
    out
}
