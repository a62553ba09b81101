use crate::error::{BrowserError, Result};

/// Browser actions for automation
///
/// Selectors are resolved against the live page on every call; nothing is
/// cached between calls.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Fill a form field by selector
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Extract the rendered inner text of an element
    async fn extract_text(&self, selector: &str) -> Result<String>;

    /// Take a screenshot
    async fn screenshot(&self) -> Result<Vec<u8>>;
}

/// Move `page` onto the scheme, host and port of `base`, keeping its path,
/// query and fragment. A base path prefix is preserved.
///
/// A `page` that does not parse as an absolute URL is replaced by `base`.
/// Non-hierarchical pages (`data:`, `about:`) have no origin to move and are
/// returned unchanged.
pub fn rebase_origin(page: &str, base: &str) -> Result<String> {
    let base_url = url::Url::parse(base)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid base URL {base}: {e}")))?;

    let Ok(page_url) = url::Url::parse(page) else {
        return Ok(base_url.to_string());
    };

    if page_url.cannot_be_a_base() {
        return Ok(page.to_string());
    }

    let prefix = base_url.path().trim_end_matches('/');
    let path = format!("{prefix}{}", page_url.path());

    let mut rebased = base_url.clone();
    rebased.set_path(&path);
    rebased.set_query(page_url.query());
    rebased.set_fragment(page_url.fragment());

    Ok(rebased.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebase_origin() {
        assert_eq!(
            rebase_origin("http://127.0.0.1:5000", "http://localhost:8080").unwrap(),
            "http://localhost:8080/"
        );
        assert_eq!(
            rebase_origin(
                "http://127.0.0.1:5000/feed?page=2#top",
                "https://staging.example.com/app/"
            )
            .unwrap(),
            "https://staging.example.com/app/feed?page=2#top"
        );
    }

    #[test]
    fn test_rebase_origin_unparseable_page() {
        assert_eq!(
            rebase_origin("not-a-url", "http://localhost:8080").unwrap(),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn test_rebase_origin_keeps_opaque_pages() {
        let page = "data:text/html,<div id=\"channels\">Каналы</div>";
        assert_eq!(rebase_origin(page, "http://localhost:8080").unwrap(), page);
        assert_eq!(
            rebase_origin("about:blank", "http://localhost:8080").unwrap(),
            "about:blank"
        );
    }

    #[test]
    fn test_rebase_origin_invalid_base() {
        assert!(rebase_origin("http://127.0.0.1:5000", "not-a-url").is_err());
    }
}
