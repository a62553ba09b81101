//! Fixture, test case and step types.
//!
//! A fixture file looks like:
//!
//! ```toml
//! [fixture]
//! name = "Getting Started"
//! page = "http://127.0.0.1:5000"
//!
//! [[test]]
//! name = "My first test"
//!
//! [[test.steps]]
//! action = "click"
//! selector = "#channels"
//!
//! [[test.steps]]
//! action = "expect-text"
//! selector = "#channels-container"
//! matcher = { contains = "Гретцки Орех" }
//! ```

use crate::error::{Result, ScenarioError};
use crate::matcher::TextMatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use vantage_core::Selector;

/// A named group of tests bound to one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Fixture metadata
    #[serde(rename = "fixture")]
    pub meta: FixtureMetadata,

    /// Tests in declaration order
    #[serde(rename = "test", default)]
    pub tests: Vec<TestCase>,
}

impl Fixture {
    /// Create an empty fixture.
    pub fn new(name: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            meta: FixtureMetadata {
                name: name.into(),
                page: page.into(),
                description: None,
            },
            tests: Vec::new(),
        }
    }

    /// Append a test.
    #[must_use]
    pub fn with_test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    /// Get the fixture name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Get the page every test starts from.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.meta.page
    }

    /// Validate names. The page URL is deliberately left to the browser.
    pub fn validate(&self) -> Result<()> {
        if self.meta.name.trim().is_empty() {
            return Err(ScenarioError::ValidationError {
                fixture: self.meta.name.clone(),
                reason: "fixture name cannot be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for test in &self.tests {
            if test.name.trim().is_empty() {
                return Err(ScenarioError::ValidationError {
                    fixture: self.meta.name.clone(),
                    reason: "test name cannot be empty".to_string(),
                });
            }
            if !seen.insert(test.name.as_str()) {
                return Err(ScenarioError::ValidationError {
                    fixture: self.meta.name.clone(),
                    reason: format!("duplicate test name '{}'", test.name),
                });
            }
        }

        Ok(())
    }
}

/// Fixture metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureMetadata {
    /// Human-readable fixture name
    pub name: String,

    /// URL opened before each test
    pub page: String,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named, ordered sequence of steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Test name, unique within its fixture
    pub name: String,

    /// Steps, executed strictly in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl TestCase {
    /// Create a test with no steps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// One browser action or assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Load another URL in the shared page
    Navigate {
        /// Target URL
        url: String,
    },

    /// Click an element
    Click {
        /// Element to click
        selector: Selector,
    },

    /// Type into a field
    TypeText {
        /// Field to type into
        selector: Selector,
        /// Text to type
        text: String,
    },

    /// Wait until an element exists
    WaitFor {
        /// Element to wait for
        selector: Selector,
    },

    /// Read an element's rendered text and check it
    ExpectText {
        /// Element to read
        selector: Selector,
        /// Expectation on the text
        matcher: TextMatcher,
    },
}

impl Step {
    /// Selector the step targets, if any.
    #[must_use]
    pub fn selector(&self) -> Option<&Selector> {
        match self {
            Self::Navigate { .. } => None,
            Self::Click { selector }
            | Self::TypeText { selector, .. }
            | Self::WaitFor { selector }
            | Self::ExpectText { selector, .. } => Some(selector),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate { url } => write!(f, "navigate to {url}"),
            Self::Click { selector } => write!(f, "click {selector}"),
            Self::TypeText { selector, .. } => write!(f, "type into {selector}"),
            Self::WaitFor { selector } => write!(f, "wait for {selector}"),
            Self::ExpectText { selector, matcher } => {
                write!(f, "expect text of {selector} to {matcher}")
            }
        }
    }
}
