//! Vantage Scenario - declarative browser scenarios and their runner.
//!
//! A [`Fixture`] binds a set of named [`TestCase`]s to a page URL. Each test
//! is an ordered list of [`Step`]s executed by the [`ScenarioRunner`] against
//! anything implementing [`vantage_browser::BrowserActions`].
//!
//! # Architecture
//!
//! - **Definitions** ([`definition`]): fixtures, tests and steps
//! - **Matchers** ([`matcher`]): NFC-normalized text expectations
//! - **Loader** ([`loader`]): TOML files from the `scenarios/` directory
//! - **Built-ins** ([`builtin`]): fixtures compiled into the binary
//! - **Runner** ([`runner`]): sequential, fail-fast execution
//! - **Report** ([`report`]): per-test outcomes and run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use vantage_browser::BrowserEngine;
//! use vantage_scenario::{builtin, RunFilter, RunOptions, ScenarioRunner};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = BrowserEngine::new().await?;
//! let fixtures = builtin::all()?;
//!
//! let runner = ScenarioRunner::new(&engine, RunOptions::default());
//! let report = runner.run(&fixtures, &RunFilter::all()).await?;
//! println!("{}", report.render_text());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builtin;
pub mod definition;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use definition::{Fixture, FixtureMetadata, Step, TestCase};
pub use error::{Result, ScenarioError, StepFailure};
pub use loader::ScenarioLoader;
pub use matcher::TextMatcher;
pub use report::{RunReport, TestOutcome, TestPhase, TestStatus};
pub use runner::{RunFilter, RunOptions, ScenarioRunner};
