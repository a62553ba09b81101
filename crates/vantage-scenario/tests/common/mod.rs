//! In-memory page used to drive the runner without Chrome.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vantage_browser::{BrowserActions, BrowserError, Result};
use vantage_scenario::RunOptions;

/// Runner options with short waits so failing tests finish quickly.
pub fn fast_options() -> RunOptions {
    RunOptions {
        selector_timeout_ms: 200,
        assertion_timeout_ms: 300,
        poll_interval: Duration::from_millis(10),
        base_url: None,
        stop_on_first_failure: false,
        screenshots_dir: None,
    }
}

#[derive(Debug, Clone)]
struct FakeElement {
    text: String,
    interactable: bool,
}

#[derive(Debug, Clone)]
struct ClickEffect {
    target: String,
    /// `None` removes the target from the page
    text: Option<String>,
    delay: Duration,
}

/// A single page served at one URL. Navigating to it restores the initial
/// DOM, so runs never see state left by a previous run.
pub struct FakePage {
    url: String,
    initial: HashMap<String, FakeElement>,
    on_click: HashMap<String, Vec<ClickEffect>>,
    live: Arc<Mutex<HashMap<String, FakeElement>>>,
    generation: Arc<AtomicU64>,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            initial: HashMap::new(),
            on_click: HashMap::new(),
            live: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add an element present on load.
    pub fn element(mut self, selector: &str, text: &str) -> Self {
        self.initial.insert(
            selector.to_string(),
            FakeElement {
                text: text.to_string(),
                interactable: true,
            },
        );
        self
    }

    /// Add an element that rejects clicks and typing.
    pub fn disabled_element(mut self, selector: &str, text: &str) -> Self {
        self.initial.insert(
            selector.to_string(),
            FakeElement {
                text: text.to_string(),
                interactable: false,
            },
        );
        self
    }

    /// Clicking `selector` sets the text of `target` after `delay`,
    /// creating the target if needed.
    pub fn on_click(mut self, selector: &str, target: &str, text: &str, delay: Duration) -> Self {
        self.on_click
            .entry(selector.to_string())
            .or_default()
            .push(ClickEffect {
                target: target.to_string(),
                text: Some(text.to_string()),
                delay,
            });
        self
    }

    /// Clicking `selector` removes `target` from the page after `delay`,
    /// as a framework does while re-rendering a node.
    pub fn on_click_detach(mut self, selector: &str, target: &str, delay: Duration) -> Self {
        self.on_click
            .entry(selector.to_string())
            .or_default()
            .push(ClickEffect {
                target: target.to_string(),
                text: None,
                delay,
            });
        self
    }

    /// Actions performed so far, e.g. `click #channels`.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn get(&self, selector: &str) -> Option<FakeElement> {
        self.live.lock().unwrap().get(selector).cloned()
    }

    fn apply(live: &Mutex<HashMap<String, FakeElement>>, effect: &ClickEffect) {
        let mut live = live.lock().unwrap();
        let Some(text) = &effect.text else {
            live.remove(&effect.target);
            return;
        };
        live.entry(effect.target.clone())
            .and_modify(|el| el.text = text.clone())
            .or_insert_with(|| FakeElement {
                text: text.clone(),
                interactable: true,
            });
    }
}

#[async_trait::async_trait]
impl BrowserActions for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(format!("navigate {url}"));
        if url.trim_end_matches('/') != self.url.trim_end_matches('/') {
            return Err(BrowserError::NavigationError(format!(
                "{url}: net::ERR_CONNECTION_REFUSED"
            )));
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.live.lock().unwrap() = self.initial.clone();
        Ok(())
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        let mut live = self.live.lock().unwrap();
        let element = live
            .get_mut(selector)
            .ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))?;
        if !element.interactable {
            return Err(BrowserError::NotInteractable(format!("{selector}: disabled")));
        }
        element.text.push_str(value);
        drop(live);
        self.record(format!("type {selector}"));
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .get(selector)
            .ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))?;
        if !element.interactable {
            return Err(BrowserError::NotInteractable(format!("{selector}: disabled")));
        }
        self.record(format!("click {selector}"));

        let generation = self.generation.load(Ordering::SeqCst);
        for effect in self.on_click.get(selector).cloned().unwrap_or_default() {
            if effect.delay.is_zero() {
                Self::apply(&self.live, &effect);
            } else {
                let live = Arc::clone(&self.live);
                let current = Arc::clone(&self.generation);
                tokio::spawn(async move {
                    tokio::time::sleep(effect.delay).await;
                    // Page was reloaded in the meantime
                    if current.load(Ordering::SeqCst) == generation {
                        Self::apply(&live, &effect);
                    }
                });
            }
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.get(selector).is_some() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "{selector} did not appear within {timeout_ms}ms"
                )));
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    async fn extract_text(&self, selector: &str) -> Result<String> {
        let element = self
            .get(selector)
            .ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))?;
        self.record(format!("read {selector}"));
        Ok(element.text)
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(b"\x89PNG\r\n\x1a\n".to_vec())
    }
}
