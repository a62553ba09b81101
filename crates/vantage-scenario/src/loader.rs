//! Fixture loading from TOML files.
//!
//! This module handles loading fixtures from the `scenarios/` directory.
//! Each `*.toml` file holds exactly one fixture.

use crate::{
    definition::Fixture,
    error::{Result, ScenarioError},
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the scenario directory at the workspace root.
pub const DEFAULT_DIR: &str = "scenarios";

/// Loader for fixtures from TOML files.
pub struct ScenarioLoader {
    /// Base directory containing scenario files
    scenarios_dir: PathBuf,
}

impl ScenarioLoader {
    /// Create a new loader with the given scenarios directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist.
    pub fn new(scenarios_dir: impl Into<PathBuf>) -> Result<Self> {
        let scenarios_dir = scenarios_dir.into();

        if !scenarios_dir.is_dir() {
            return Err(ScenarioError::DirectoryNotFound {
                path: scenarios_dir.display().to_string(),
            });
        }

        Ok(Self { scenarios_dir })
    }

    /// Create a loader using the default scenarios directory.
    ///
    /// Looks for `scenarios/` at the enclosing workspace root, then relative
    /// to the current directory.
    ///
    /// # Errors
    /// Returns error if the default directory doesn't exist.
    pub fn with_default_dir() -> Result<Self> {
        let mut current_dir = std::env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                if let Ok(contents) = std::fs::read_to_string(&cargo_toml) {
                    if contents.contains("[workspace]") {
                        return Self::new(current_dir.join(DEFAULT_DIR));
                    }
                }
            }

            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }

        Self::new(PathBuf::from(DEFAULT_DIR))
    }

    /// Directory this loader reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.scenarios_dir
    }

    /// Load a single fixture by file stem (e.g. `getting-started`).
    ///
    /// # Errors
    /// Returns error if the file doesn't exist, can't be read, or is invalid.
    pub fn load(&self, name: &str) -> Result<Fixture> {
        let filename = format!("{name}.toml");

        let Some(path) = Self::find_file(&self.scenarios_dir, &filename)? else {
            return Err(ScenarioError::NotFound {
                name: name.to_string(),
            });
        };

        let fixture = Self::load_from_path(&path)?;
        fixture.validate()?;

        debug!(
            path = %path.display(),
            fixture = %fixture.name(),
            tests = fixture.tests.len(),
            "loaded fixture"
        );

        Ok(fixture)
    }

    /// Load all fixtures from the scenarios directory, sorted by path.
    ///
    /// Invalid files and fixtures whose name was already loaded are logged
    /// as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<Fixture>> {
        let mut paths = Vec::new();
        Self::collect_files(&self.scenarios_dir, &mut paths)?;
        paths.sort();

        let mut fixtures = Vec::new();
        let mut names = HashSet::new();

        for path in paths {
            let fixture = match Self::load_from_path(&path) {
                Ok(fixture) => fixture,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load fixture");
                    continue;
                }
            };

            if let Err(e) = fixture.validate() {
                warn!(path = %path.display(), error = %e, "skipping invalid fixture");
                continue;
            }

            if !names.insert(fixture.name().to_string()) {
                warn!(
                    path = %path.display(),
                    fixture = %fixture.name(),
                    "skipping duplicate fixture name"
                );
                continue;
            }

            fixtures.push(fixture);
        }

        info!(
            count = fixtures.len(),
            dir = %self.scenarios_dir.display(),
            "loaded fixtures"
        );

        Ok(fixtures)
    }

    /// Recursively collect TOML files, skipping `README.toml`.
    fn collect_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                Self::collect_files(&path, paths)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml")
                && path.file_name().and_then(|s| s.to_str()) != Some("README.toml")
            {
                paths.push(path);
            }
        }

        Ok(())
    }

    /// Recursively search for a file by name.
    fn find_file(dir: &Path, filename: &str) -> Result<Option<PathBuf>> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                if let Some(found) = Self::find_file(&path, filename)? {
                    return Ok(Some(found));
                }
            } else if path.file_name().and_then(|s| s.to_str()) == Some(filename) {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Load a fixture from a specific file path without validating it.
    pub fn load_from_path(path: &Path) -> Result<Fixture> {
        let contents = std::fs::read_to_string(path).map_err(|e| ScenarioError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        toml::from_str(&contents).map_err(|e| ScenarioError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Step;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path, file_stem: &str, fixture_name: &str) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create dir");
        let path = dir.join(format!("{file_stem}.toml"));

        let content = format!(
            r##"
[fixture]
name = "{fixture_name}"
page = "http://127.0.0.1:5000"

[[test]]
name = "My first test"

[[test.steps]]
action = "click"
selector = "#channels"

[[test.steps]]
action = "expect-text"
selector = "#channels-container"
matcher = {{ contains = "Гретцки Орех" }}
"##
        );

        std::fs::write(&path, content).expect("write fixture file");
        path
    }

    #[test]
    fn test_loader_new_with_existing_dir() {
        let temp_dir = TempDir::new().expect("create temp dir");
        assert!(ScenarioLoader::new(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_loader_new_with_nonexistent_dir() {
        let loader = ScenarioLoader::new("/nonexistent/path/to/scenarios");
        assert!(matches!(
            loader,
            Err(ScenarioError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_load_single_fixture() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_fixture(temp_dir.path(), "getting-started", "Getting Started");

        let loader = ScenarioLoader::new(temp_dir.path()).expect("create loader");
        let fixture = loader.load("getting-started").expect("load fixture");

        assert_eq!(fixture.name(), "Getting Started");
        assert_eq!(fixture.tests[0].name, "My first test");
        assert!(matches!(fixture.tests[0].steps[0], Step::Click { .. }));
    }

    #[test]
    fn test_load_nonexistent_fixture() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let loader = ScenarioLoader::new(temp_dir.path()).expect("create loader");

        let result = loader.load("nonexistent");
        assert!(matches!(result, Err(ScenarioError::NotFound { .. })));
    }

    #[test]
    fn test_load_all_nested_and_sorted() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_fixture(&temp_dir.path().join("smoke"), "b", "Second");
        write_fixture(temp_dir.path(), "a", "First");

        let loader = ScenarioLoader::new(temp_dir.path()).expect("create loader");
        let fixtures = loader.load_all().expect("load all fixtures");

        let names: Vec<_> = fixtures.iter().map(Fixture::name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_load_all_skips_invalid_and_readme() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_fixture(temp_dir.path(), "valid", "Valid");

        std::fs::write(temp_dir.path().join("broken.toml"), "invalid toml [[[")
            .expect("write invalid file");
        std::fs::write(temp_dir.path().join("README.toml"), "not a fixture")
            .expect("write readme");

        let loader = ScenarioLoader::new(temp_dir.path()).expect("create loader");
        let fixtures = loader.load_all().expect("load all fixtures");

        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].name(), "Valid");
    }

    #[test]
    fn test_load_all_skips_duplicate_names() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_fixture(temp_dir.path(), "one", "Getting Started");
        write_fixture(temp_dir.path(), "two", "Getting Started");

        let loader = ScenarioLoader::new(temp_dir.path()).expect("create loader");
        assert_eq!(loader.load_all().expect("load all").len(), 1);
    }

    #[test]
    fn test_load_reports_parse_error() {
        let temp_dir = TempDir::new().expect("create temp dir");
        std::fs::write(temp_dir.path().join("broken.toml"), "[fixture]\nname = 1")
            .expect("write broken file");

        let loader = ScenarioLoader::new(temp_dir.path()).expect("create loader");
        assert!(matches!(
            loader.load("broken"),
            Err(ScenarioError::ParseError { .. })
        ));
    }
}
