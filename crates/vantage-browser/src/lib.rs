//! Browser automation engine for end-to-end scenarios.
//!
//! Provides the [`BrowserActions`] capability trait consumed by the scenario
//! runner and a headless Chrome implementation of it.

pub mod actions;
pub mod engine;
pub mod error;

pub use actions::{rebase_origin, BrowserActions};
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
