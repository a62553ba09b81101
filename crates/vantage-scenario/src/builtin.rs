//! Scenarios compiled into the binary.

use crate::definition::{Fixture, Step, TestCase};
use crate::error::Result;
use crate::matcher::TextMatcher;
use vantage_core::Selector;

/// Page served by the local channel viewer.
pub const DEFAULT_PAGE: &str = "http://127.0.0.1:5000";

/// The "Getting Started" fixture: open the channel list and check that the
/// expected channel is rendered.
pub fn getting_started() -> Result<Fixture> {
    let test = TestCase::new("My first test")
        .step(Step::Click {
            selector: Selector::new("#channels")?,
        })
        .step(Step::ExpectText {
            selector: Selector::new("#channels-container")?,
            matcher: TextMatcher::Contains("Гретцки Орех".to_string()),
        });

    Ok(Fixture::new("Getting Started", DEFAULT_PAGE).with_test(test))
}

/// All built-in fixtures.
pub fn all() -> Result<Vec<Fixture>> {
    Ok(vec![getting_started()?])
}
