//! Shared types used across the Vantage crates.

use crate::error::{Result, VantageError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for CSS element selectors with validation.
///
/// Selectors are opaque to Vantage: they are handed to the browser as-is and
/// resolved against the live page at execution time. Only obviously broken
/// input is rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector(String);

impl Selector {
    /// Longest selector accepted.
    pub const MAX_LEN: usize = 1024;

    /// Create a new `Selector` from a string.
    ///
    /// # Errors
    /// Returns error if the selector is blank, spans lines, or is too long.
    pub fn new(selector: impl Into<String>) -> Result<Self> {
        let selector = selector.into();
        Self::validate(&selector)?;
        Ok(Self(selector))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(selector: &str) -> Result<()> {
        if selector.trim().is_empty() {
            return Err(VantageError::Validation(
                "invalid selector: must not be empty".to_string(),
            ));
        }

        if selector.contains(['\n', '\r']) {
            return Err(VantageError::Validation(format!(
                "invalid selector: must be a single line, got '{}'",
                selector.escape_debug()
            )));
        }

        if selector.len() > Self::MAX_LEN {
            return Err(VantageError::Validation(format!(
                "invalid selector: must be at most {} bytes, got {}",
                Self::MAX_LEN,
                selector.len()
            )));
        }

        Ok(())
    }
}

impl TryFrom<String> for Selector {
    type Error = VantageError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
