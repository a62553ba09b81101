//! Text expectations applied to rendered element text.
//!
//! Both sides are NFC-normalized before comparison, so a page that emits
//! decomposed Cyrillic (`и` + U+0306) still matches a composed `й` in a
//! scenario file. Comparison is case-sensitive and locale-independent.

use crate::error::StepFailure;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Expectation on an element's rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextMatcher {
    /// Text contains the substring
    Contains(String),
    /// Text does not contain the substring
    NotContains(String),
    /// Text equals the value exactly
    Equals(String),
    /// Text matches the regular expression
    Matches(String),
}

impl TextMatcher {
    /// Check `actual` against the expectation.
    ///
    /// # Errors
    /// Returns [`StepFailure::InvalidExpectation`] if a `matches` pattern
    /// does not compile.
    pub fn evaluate(&self, actual: &str) -> Result<bool, StepFailure> {
        let actual = normalize(actual);
        let matched = match self {
            Self::Contains(expected) => actual.contains(normalize(expected).as_str()),
            Self::NotContains(expected) => !actual.contains(normalize(expected).as_str()),
            Self::Equals(expected) => actual == normalize(expected),
            Self::Matches(pattern) => {
                let regex = Regex::new(&normalize(pattern)).map_err(|e| {
                    StepFailure::InvalidExpectation {
                        reason: e.to_string(),
                    }
                })?;
                regex.is_match(&actual)
            }
        };
        Ok(matched)
    }
}

impl fmt::Display for TextMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(s) => write!(f, "contain {s:?}"),
            Self::NotContains(s) => write!(f, "not contain {s:?}"),
            Self::Equals(s) => write!(f, "equal {s:?}"),
            Self::Matches(s) => write!(f, "match /{s}/"),
        }
    }
}

fn normalize(text: &str) -> String {
    text.nfc().collect()
}
