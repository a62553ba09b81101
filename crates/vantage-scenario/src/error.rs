//! Error types for scenario loading and execution.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while loading, validating or scheduling scenarios.
///
/// Failures of individual steps are not errors at this level: they become
/// a failed [`crate::report::TestOutcome`] carrying a [`StepFailure`].
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Scenario file not found
    #[error("scenario file not found: {name}")]
    NotFound {
        /// File stem that was looked up
        name: String,
    },

    /// Failed to read a scenario file
    #[error("failed to load scenario file {path}: {source}")]
    LoadError {
        /// Path to the scenario file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse scenario TOML
    #[error("failed to parse scenario TOML in {path}: {source}")]
    ParseError {
        /// Path to the scenario file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Fixture failed validation
    #[error("invalid fixture '{fixture}': {reason}")]
    ValidationError {
        /// Fixture name being validated
        fixture: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Scenario directory not found
    #[error("scenario directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// A filter selected no tests
    #[error("no tests matched {filter}")]
    NoTestsMatched {
        /// Human-readable filter description
        filter: String,
    },

    /// Invalid selector in a declaration built from code
    #[error("invalid selector: {0}")]
    InvalidSelector(#[from] vantage_core::VantageError),

    /// Browser could not be prepared for the run
    #[error("browser error: {0}")]
    Browser(#[from] vantage_browser::BrowserError),

    /// I/O error while accessing scenario files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for scenario operations.
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Why a single test case failed. The first failing step ends the test.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepFailure {
    /// The fixture page or a navigate step could not be loaded
    #[error("navigation to {url} failed: {reason}")]
    NavigationFailed {
        /// Target URL
        url: String,
        /// Reason reported by the browser
        reason: String,
    },

    /// Selector matched nothing within the selector timeout
    #[error("element {selector} not found within {timeout_ms}ms")]
    LocatorMiss {
        /// Selector that did not resolve
        selector: String,
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// Element resolved but could not be clicked or typed into
    #[error("element {selector} is not interactable: {reason}")]
    InteractionFailed {
        /// Target selector
        selector: String,
        /// Reason reported by the browser
        reason: String,
    },

    /// Rendered text did not satisfy the expectation
    #[error("text of {selector} expected to {expected}, actual: {actual:?}")]
    AssertionMismatch {
        /// Selector whose text was read
        selector: String,
        /// Description of the expectation
        expected: String,
        /// Last observed text
        actual: String,
    },

    /// The expectation itself is unusable (e.g. a bad regular expression)
    #[error("invalid expectation: {reason}")]
    InvalidExpectation {
        /// Why the expectation cannot be evaluated
        reason: String,
    },

    /// Any other automation-layer error
    #[error("browser error: {reason}")]
    Browser {
        /// Error reported by the browser
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_mismatch_reports_actual() {
        let failure = StepFailure::AssertionMismatch {
            selector: "#channels-container".to_string(),
            expected: "contain \"Гретцки Орех\"".to_string(),
            actual: "Гретцки".to_string(),
        };
        let message = failure.to_string();
        assert!(message.contains("#channels-container"));
        assert!(message.contains("Гретцки Орех"));
        assert!(message.contains("actual: \"Гретцки\""));
    }

    #[test]
    fn test_step_failure_serializes_kind() {
        let failure = StepFailure::LocatorMiss {
            selector: "#channels".to_string(),
            timeout_ms: 10_000,
        };
        let json = serde_json::to_value(&failure).expect("serialize failure");
        assert_eq!(json["kind"], "locator-miss");
        assert_eq!(json["selector"], "#channels");
    }
}
