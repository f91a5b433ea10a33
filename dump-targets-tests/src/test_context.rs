//! Scratch directory plus configuration for file-based tests
//!
//! A `TestContext` owns a temporary directory that lives as long as the
//! context, so config files written into it can be loaded back by path.

use crate::config_builder::ConfigBuilder;
use anyhow::{Context, Result};
use dump_targets::config::{load_config, Config};
use std::fmt::{Debug, Display};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name `create_config` and `write_config` use
pub const CONFIG_FILE: &str = "config.yaml";

pub struct TestContext {
    dir: TempDir,
    config: Option<Config>,
}

impl TestContext {
    /// Empty scratch directory, no configuration
    pub fn new() -> Self {
        let dir = TempDir::new().expect("scratch directory");
        Self { dir, config: None }
    }

    /// Scratch directory holding the `ConfigBuilder::minimal` backup dir
    pub fn with_minimal_config() -> Self {
        Self::from_builder(ConfigBuilder::minimal())
    }

    /// Take over the builder's directory so its file targets stay valid
    pub fn from_builder(builder: ConfigBuilder) -> Self {
        let (config, dir) = builder.persist();
        Self {
            dir,
            config: Some(config),
        }
    }

    pub fn temp_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Write `content` to `name`, creating intermediate directories
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let parent = path.parent().unwrap_or(self.dir.path());
        fs::create_dir_all(parent).expect("parent directory");
        fs::write(&path, content).expect("write test file");
        path
    }

    /// Write a raw YAML document as the context's config file
    pub fn create_config(&self, content: &str) -> PathBuf {
        self.create_file(CONFIG_FILE, content)
    }

    /// Encode the context's configuration as YAML and write it out
    pub fn write_config(&self) -> Result<PathBuf> {
        let config = self.config().context("context has no configuration")?;
        let yaml = config.to_yaml()?;
        Ok(self.create_config(&yaml))
    }

    /// Load whatever is currently in the config file
    pub fn load(&self) -> Result<Config> {
        let path = self.dir.path().join(CONFIG_FILE);
        load_config(&path).with_context(|| format!("loading {}", path.display()))
    }

    pub fn read_file(&self, name: &str) -> Result<String> {
        let path = self.dir.path().join(name);
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Panicking accessors for `Result` that print the error with `Display`
pub trait ResultAssertions<T, E> {
    fn assert_ok(self) -> T;

    /// Returns the error for further inspection
    fn assert_err(self) -> E;

    fn assert_err_contains(self, needle: &str) -> E;
}

impl<T: Debug, E: Display> ResultAssertions<T, E> for std::result::Result<T, E> {
    #[track_caller]
    fn assert_ok(self) -> T {
        self.unwrap_or_else(|e| panic!("expected success, failed with: {}", e))
    }

    #[track_caller]
    fn assert_err(self) -> E {
        match self {
            Ok(value) => panic!("expected failure, succeeded with: {:?}", value),
            Err(e) => e,
        }
    }

    #[track_caller]
    fn assert_err_contains(self, needle: &str) -> E {
        let err = self.assert_err();
        let message = err.to_string();
        assert!(message.contains(needle), "{:?} not found in error: {}", needle, message);
        err
    }
}

pub trait OptionAssertions<T> {
    fn assert_some(self) -> T;
    fn assert_none(self);
}

impl<T: Debug> OptionAssertions<T> for Option<T> {
    #[track_caller]
    fn assert_some(self) -> T {
        self.unwrap_or_else(|| panic!("expected a value, found nothing"))
    }

    #[track_caller]
    fn assert_none(self) {
        assert!(self.is_none(), "expected nothing, found: {:?}", self);
    }
}
