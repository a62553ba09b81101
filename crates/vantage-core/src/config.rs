//! Configuration management for Vantage.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/vantage/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Scenario execution settings
    pub runner: RunnerConfig,
    /// Report and artifact settings
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `VANTAGE_HEADLESS`: Override browser headless mode (true/false)
    /// - `VANTAGE_SELECTOR_TIMEOUT_MS`: Override element resolution timeout
    /// - `VANTAGE_ASSERTION_TIMEOUT_MS`: Override assertion timeout
    /// - `VANTAGE_BASE_URL`: Replace every fixture page URL
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("VANTAGE_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("VANTAGE_SELECTOR_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.runner.selector_timeout_ms = ms;
                tracing::debug!("Override runner.selector_timeout_ms from env: {}", ms);
            }
        }

        if let Some(val) = lookup("VANTAGE_ASSERTION_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.runner.assertion_timeout_ms = ms;
                tracing::debug!("Override runner.assertion_timeout_ms from env: {}", ms);
            }
        }

        if let Some(val) = lookup("VANTAGE_BASE_URL") {
            if !val.trim().is_empty() {
                tracing::debug!("Override runner.base_url from env: {}", val);
                self.runner.base_url = Some(val);
            }
        }
    }

    /// Check values that would make a run meaningless.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.runner.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "runner.poll_interval_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "browser.window_width/window_height".to_string(),
                reason: "window dimensions must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        fs::write(config_path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the configuration as pretty TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/vantage/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "vantage", "vantage").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Launch Chrome without its sandbox (needed in most containers)
    pub no_sandbox: bool,
    /// Explicit Chrome/Chromium executable; auto-detected when unset
    pub executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            no_sandbox: true,
            executable: None,
        }
    }
}

/// Scenario execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Replaces every fixture page URL when set
    pub base_url: Option<String>,
    /// How long a selector may take to resolve, in milliseconds
    pub selector_timeout_ms: u64,
    /// How long a text assertion keeps re-reading before failing, in milliseconds
    pub assertion_timeout_ms: u64,
    /// Delay between re-reads while waiting, in milliseconds
    pub poll_interval_ms: u64,
    /// Skip remaining tests after the first failure
    pub stop_on_first_failure: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            selector_timeout_ms: 10_000,
            assertion_timeout_ms: 3_000,
            poll_interval_ms: 50,
            stop_on_first_failure: false,
        }
    }
}

/// Report and artifact settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory for failure screenshots; screenshots are disabled when unset
    pub screenshots_dir: Option<PathBuf>,
    /// Print the run report as JSON instead of text
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.browser.headless);
        assert_eq!(config.runner.selector_timeout_ms, 10_000);
        assert_eq!(config.runner.assertion_timeout_ms, 3_000);
        assert!(config.runner.base_url.is_none());
        assert!(config.report.screenshots_dir.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = config.to_toml().expect("serialize default config");
        assert!(toml_str.contains("[browser]"));
        assert!(toml_str.contains("[runner]"));
        assert!(toml_str.contains("[report]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(
            parsed.runner.selector_timeout_ms,
            config.runner.selector_timeout_ms
        );
    }

    #[test]
    fn test_load_from_path() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.browser.headless = false;
        config.runner.assertion_timeout_ms = 500;
        fs::write(&config_path, config.to_toml().expect("serialize config"))
            .expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert!(!loaded.browser.headless);
        assert_eq!(loaded.runner.assertion_timeout_ms, 500);
    }

    #[test]
    fn test_load_from_missing_path() {
        let tmp = TempDir::new().expect("create temp dir");
        let result = AppConfig::load_from(&tmp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("VANTAGE_HEADLESS", "false"),
            ("VANTAGE_SELECTOR_TIMEOUT_MS", "2500"),
            ("VANTAGE_ASSERTION_TIMEOUT_MS", "not-a-number"),
            ("VANTAGE_BASE_URL", "http://localhost:8080"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert!(!config.browser.headless);
        assert_eq!(config.runner.selector_timeout_ms, 2500);
        // Unparseable values leave the default in place
        assert_eq!(config.runner.assertion_timeout_ms, 3_000);
        assert_eq!(
            config.runner.base_url.as_deref(),
            Some("http://localhost:8080")
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r"
[runner]
selector_timeout_ms = 1000
";

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.runner.selector_timeout_ms, 1000);
        // These should be defaults
        assert_eq!(config.runner.poll_interval_ms, 50);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = AppConfig::default();
        config.runner.poll_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
