use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("element not interactable: {0}")]
    NotInteractable(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

impl BrowserError {
    /// Whether the error means the selector never resolved.
    #[must_use]
    pub fn is_locator_miss(&self) -> bool {
        matches!(self, Self::SelectorNotFound(_) | Self::Timeout(_))
    }
}
