//! Test outcomes and run reports.

use crate::error::StepFailure;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use uuid::Uuid;

/// Progress of a single test, named after the last action that completed.
/// The terminal passed/failed state is carried by [`TestStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestPhase {
    /// Nothing has happened yet
    NotStarted,
    /// Loading the fixture page or a navigate step
    Navigating,
    /// An element was clicked or typed into
    Interacted,
    /// Element text was read
    TextRead,
    /// An expectation held
    Asserted,
}

/// Terminal status of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// All steps succeeded
    Passed,
    /// A step failed
    Failed,
}

/// Result of running one test case.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    /// Owning fixture
    pub fixture: String,
    /// Test name
    pub test: String,
    /// Terminal status
    pub status: TestStatus,
    /// Last phase reached before the terminal state
    pub phase: TestPhase,
    /// Index of the failing step; `None` for the implicit page load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<usize>,
    /// Why the test failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    /// Wall-clock duration
    pub duration_ms: u64,
    /// Screenshot captured after the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

impl TestOutcome {
    /// Check if the test passed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Outcomes of one runner invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique run identifier
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Outcomes in execution order
    pub outcomes: Vec<TestOutcome>,
}

impl RunReport {
    /// Number of passed tests
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed tests
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// True when at least one test ran and none failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.outcomes.is_empty() && self.failed() == 0
    }

    /// Human-readable summary, one line per test.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mut current_fixture: Option<&str> = None;

        for outcome in &self.outcomes {
            if current_fixture != Some(outcome.fixture.as_str()) {
                let _ = writeln!(out, " {}", outcome.fixture);
                current_fixture = Some(outcome.fixture.as_str());
            }

            let mark = if outcome.is_success() { "✓" } else { "✖" };
            let _ = writeln!(out, " {mark} {} ({}ms)", outcome.test, outcome.duration_ms);

            if let Some(failure) = &outcome.failure {
                match outcome.failed_step {
                    Some(index) => {
                        let _ = writeln!(out, "     step {}: {failure}", index + 1);
                    }
                    None => {
                        let _ = writeln!(out, "     page load: {failure}");
                    }
                }
            }
            if let Some(path) = &outcome.screenshot {
                let _ = writeln!(out, "     screenshot: {}", path.display());
            }
        }

        let _ = writeln!(out, "\n {} passed, {} failed", self.passed(), self.failed());
        out
    }
}
