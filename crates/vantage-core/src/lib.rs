//! Vantage Core - Foundation crate for the Vantage scenario runner.
//!
//! This crate provides shared types, error handling and configuration
//! management that the browser, scenario and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Validation and configuration errors using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`Selector`)
//!
//! # Example
//!
//! ```rust
//! use vantage_core::{AppConfig, Selector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert!(config.browser.headless);
//!
//! let selector = Selector::new("#channels")?;
//! assert_eq!(selector.as_str(), "#channels");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, ReportConfig, RunnerConfig};
pub use error::{ConfigError, ConfigResult, Result, VantageError};
pub use types::Selector;
