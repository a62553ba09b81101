//! Sequential scenario runner.
//!
//! Every test starts by loading its fixture page, then executes its steps in
//! declaration order on the shared browser page. The first failing step ends
//! the test; there is no retry. Two implicit waits apply: element lookups wait
//! up to the selector timeout, and text expectations re-read the element until
//! they hold or the assertion timeout elapses.

use crate::definition::{Fixture, Step, TestCase};
use crate::error::{Result, ScenarioError, StepFailure};
use crate::matcher::TextMatcher;
use crate::report::{RunReport, TestOutcome, TestPhase, TestStatus};
use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vantage_browser::{rebase_origin, BrowserActions, BrowserError};
use vantage_core::{AppConfig, Selector};

/// Execution settings for a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// How long a selector may take to resolve, in milliseconds
    pub selector_timeout_ms: u64,
    /// How long a text expectation keeps re-reading, in milliseconds
    pub assertion_timeout_ms: u64,
    /// Delay between re-reads
    pub poll_interval: Duration,
    /// Replaces the origin of every fixture page
    pub base_url: Option<String>,
    /// Skip remaining tests after the first failure
    pub stop_on_first_failure: bool,
    /// Where failure screenshots go; disabled when unset
    pub screenshots_dir: Option<PathBuf>,
}

impl RunOptions {
    /// Build options from the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            selector_timeout_ms: config.runner.selector_timeout_ms,
            assertion_timeout_ms: config.runner.assertion_timeout_ms,
            poll_interval: Duration::from_millis(config.runner.poll_interval_ms),
            base_url: config.runner.base_url.clone(),
            stop_on_first_failure: config.runner.stop_on_first_failure,
            screenshots_dir: config.report.screenshots_dir.clone(),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Selects fixtures and tests by exact name.
#[derive(Debug, Clone, Default)]
pub struct RunFilter {
    /// Fixture name to run
    pub fixture: Option<String>,
    /// Test name to run
    pub test: Option<String>,
}

impl RunFilter {
    /// Select everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Check whether a fixture is selected.
    #[must_use]
    pub fn matches_fixture(&self, fixture: &Fixture) -> bool {
        self.fixture.as_deref().map_or(true, |name| fixture.name() == name)
    }

    /// Check whether a test is selected.
    #[must_use]
    pub fn matches_test(&self, test: &TestCase) -> bool {
        self.test.as_deref().map_or(true, |name| test.name == name)
    }
}

impl fmt::Display for RunFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.fixture, &self.test) {
            (None, None) => write!(f, "any fixture"),
            (Some(fixture), None) => write!(f, "fixture '{fixture}'"),
            (None, Some(test)) => write!(f, "test '{test}'"),
            (Some(fixture), Some(test)) => write!(f, "fixture '{fixture}', test '{test}'"),
        }
    }
}

/// Runs fixtures against one browser.
pub struct ScenarioRunner<'a, B: BrowserActions + ?Sized> {
    browser: &'a B,
    options: RunOptions,
}

impl<'a, B: BrowserActions + ?Sized> ScenarioRunner<'a, B> {
    /// Create a runner over a browser.
    pub fn new(browser: &'a B, options: RunOptions) -> Self {
        Self { browser, options }
    }

    /// Run every selected test of every selected fixture, in order.
    ///
    /// # Errors
    /// Returns [`ScenarioError::NoTestsMatched`] if the filter selects
    /// nothing, or a browser error if the base URL override is invalid.
    /// Failing tests are reported in the [`RunReport`], not as errors.
    pub async fn run(&self, fixtures: &[Fixture], filter: &RunFilter) -> Result<RunReport> {
        let selected: Vec<(&Fixture, &TestCase)> = fixtures
            .iter()
            .filter(|fixture| filter.matches_fixture(fixture))
            .flat_map(|fixture| {
                fixture
                    .tests
                    .iter()
                    .filter(|test| filter.matches_test(test))
                    .map(move |test| (fixture, test))
            })
            .collect();

        if selected.is_empty() {
            return Err(ScenarioError::NoTestsMatched {
                filter: filter.to_string(),
            });
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, tests = selected.len(), "starting run");

        let mut outcomes = Vec::with_capacity(selected.len());
        for (fixture, test) in selected {
            let outcome = self.run_test(fixture, test).await?;
            let failed = !outcome.is_success();
            outcomes.push(outcome);

            if failed && self.options.stop_on_first_failure {
                info!("stopping after first failure");
                break;
            }
        }

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        info!(
            %run_id,
            passed = report.passed(),
            failed = report.failed(),
            "run finished"
        );

        Ok(report)
    }

    /// Run one test of a fixture.
    ///
    /// # Errors
    /// Only fails if the base URL override is invalid.
    pub async fn run_test(&self, fixture: &Fixture, test: &TestCase) -> Result<TestOutcome> {
        let page = self.page_for(fixture)?;
        info!(fixture = fixture.name(), test = %test.name, page = %page, "running test");

        let started = Instant::now();
        let mut phase = TestPhase::NotStarted;
        let result = self.execute(&page, test, &mut phase).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let outcome = match result {
            Ok(()) => {
                info!(fixture = fixture.name(), test = %test.name, duration_ms, "test passed");
                TestOutcome {
                    fixture: fixture.name().to_string(),
                    test: test.name.clone(),
                    status: TestStatus::Passed,
                    phase,
                    failed_step: None,
                    failure: None,
                    duration_ms,
                    screenshot: None,
                }
            }
            Err((failed_step, failure)) => {
                warn!(
                    fixture = fixture.name(),
                    test = %test.name,
                    step = ?failed_step,
                    error = %failure,
                    "test failed"
                );
                let screenshot = self.capture_failure(fixture, test).await;
                TestOutcome {
                    fixture: fixture.name().to_string(),
                    test: test.name.clone(),
                    status: TestStatus::Failed,
                    phase,
                    failed_step,
                    failure: Some(failure),
                    duration_ms,
                    screenshot,
                }
            }
        };

        Ok(outcome)
    }

    fn page_for(&self, fixture: &Fixture) -> Result<String> {
        match &self.options.base_url {
            Some(base) => Ok(rebase_origin(fixture.page(), base)?),
            None => Ok(fixture.page().to_string()),
        }
    }

    async fn execute(
        &self,
        page: &str,
        test: &TestCase,
        phase: &mut TestPhase,
    ) -> std::result::Result<(), (Option<usize>, StepFailure)> {
        *phase = TestPhase::Navigating;
        self.navigate(page).await.map_err(|f| (None, f))?;

        for (index, step) in test.steps.iter().enumerate() {
            debug!(step = index + 1, action = %step, "executing step");
            self.execute_step(step, phase)
                .await
                .map_err(|f| (Some(index), f))?;
        }

        Ok(())
    }

    async fn execute_step(
        &self,
        step: &Step,
        phase: &mut TestPhase,
    ) -> std::result::Result<(), StepFailure> {
        if let Some(selector) = step.selector() {
            self.locate(selector).await?;
        }

        match step {
            Step::Navigate { url } => {
                *phase = TestPhase::Navigating;
                self.navigate(url).await
            }
            Step::Click { selector } => {
                self.browser
                    .click(selector.as_str())
                    .await
                    .map_err(|e| self.interaction_failure(selector, e))?;
                *phase = TestPhase::Interacted;
                Ok(())
            }
            Step::TypeText { selector, text } => {
                self.browser
                    .fill_field(selector.as_str(), text)
                    .await
                    .map_err(|e| self.interaction_failure(selector, e))?;
                *phase = TestPhase::Interacted;
                Ok(())
            }
            Step::WaitFor { .. } => Ok(()),
            Step::ExpectText { selector, matcher } => {
                self.expect_text(selector, matcher, phase).await
            }
        }
    }

    async fn navigate(&self, url: &str) -> std::result::Result<(), StepFailure> {
        self.browser
            .navigate(url)
            .await
            .map_err(|e| StepFailure::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn locate(&self, selector: &Selector) -> std::result::Result<(), StepFailure> {
        self.browser
            .wait_for_selector(selector.as_str(), self.options.selector_timeout_ms)
            .await
            .map_err(|e| self.lookup_failure(selector, e))
    }

    /// Re-read the element until the matcher holds or the assertion timeout
    /// elapses. A node that is briefly detached (e.g. re-rendered) counts as
    /// not yet matching.
    async fn expect_text(
        &self,
        selector: &Selector,
        matcher: &TextMatcher,
        phase: &mut TestPhase,
    ) -> std::result::Result<(), StepFailure> {
        let started = Instant::now();
        let deadline = started + Duration::from_millis(self.options.assertion_timeout_ms);
        let mut last_read = None;

        loop {
            match self.browser.extract_text(selector.as_str()).await {
                Ok(actual) => {
                    *phase = TestPhase::TextRead;
                    if matcher.evaluate(&actual)? {
                        *phase = TestPhase::Asserted;
                        return Ok(());
                    }
                    last_read = Some(actual);
                }
                Err(e) if e.is_locator_miss() => {
                    debug!(%selector, "element detached while reading text");
                    last_read = None;
                }
                Err(e) => return Err(self.lookup_failure(selector, e)),
            }

            if Instant::now() >= deadline {
                return Err(match last_read {
                    Some(actual) => StepFailure::AssertionMismatch {
                        selector: selector.to_string(),
                        expected: matcher.to_string(),
                        actual,
                    },
                    None => StepFailure::LocatorMiss {
                        selector: selector.to_string(),
                        timeout_ms: u64::try_from(started.elapsed().as_millis())
                            .unwrap_or(u64::MAX),
                    },
                });
            }

            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    fn lookup_failure(&self, selector: &Selector, err: BrowserError) -> StepFailure {
        if err.is_locator_miss() {
            StepFailure::LocatorMiss {
                selector: selector.to_string(),
                timeout_ms: self.options.selector_timeout_ms,
            }
        } else {
            StepFailure::Browser {
                reason: err.to_string(),
            }
        }
    }

    fn interaction_failure(&self, selector: &Selector, err: BrowserError) -> StepFailure {
        match err {
            BrowserError::NotInteractable(reason) => StepFailure::InteractionFailed {
                selector: selector.to_string(),
                reason,
            },
            other => self.lookup_failure(selector, other),
        }
    }

    async fn capture_failure(&self, fixture: &Fixture, test: &TestCase) -> Option<PathBuf> {
        let dir = self.options.screenshots_dir.as_deref()?;

        match self.save_screenshot(dir, fixture, test).await {
            Ok(path) => {
                info!(path = %path.display(), "saved failure screenshot");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "failed to capture screenshot");
                None
            }
        }
    }

    async fn save_screenshot(
        &self,
        dir: &Path,
        fixture: &Fixture,
        test: &TestCase,
    ) -> Result<PathBuf> {
        let png = self.browser.screenshot().await?;
        tokio::fs::create_dir_all(dir).await?;

        let file_name = format!(
            "{}-{}-{}.png",
            file_safe(fixture.name()),
            file_safe(&test.name),
            Utc::now().format("%Y%m%dT%H%M%S%.3f")
        );
        let path = dir.join(file_name);
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }
}

/// Replace characters that are awkward in file names.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}
