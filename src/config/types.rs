use super::schedule::Schedule;
use super::targets::Targets;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Schema identifier every configuration document carries
pub const CONFIG_TYPE: &str = "config.databack.io";

/// Schema version understood by this build
pub const CONFIG_VERSION: &str = "1";

/// Root configuration structure
///
/// Built once by the loader and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    #[serde(rename = "type")]
    pub config_type: String,
    pub version: String,
    pub logging: LogLevel,
    pub dump: Dump,
    pub restore: Restore,
    pub database: Database,
    pub targets: Targets,
}

impl Config {
    /// Names in `dump.targets` that have no declaration in the targets table
    pub fn missing_dump_targets(&self) -> Vec<&str> {
        self.dump
            .targets
            .iter()
            .filter(|name| self.targets.get(name).is_none())
            .map(String::as_str)
            .collect()
    }
}

/// Logging verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Dump job settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Dump {
    /// Databases to dump (all when empty)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Databases to skip
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// Replace `:` in generated file names
    pub safechars: bool,

    /// Omit `USE <database>` from dump files
    pub no_database_name: bool,

    pub schedule: Schedule,

    pub compression: Compression,

    /// Single-line INSERT statements
    pub compact: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_allowed_packet: Option<u64>,

    /// Scratch directory for dump files before upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmp_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename_pattern: Option<String>,

    pub scripts: BackupScripts,

    /// Names of entries in the targets table to upload to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Gzip,
    Bzip2,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BackupScripts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_backup: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_backup: Option<PathBuf>,
}

/// Restore job settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Restore {
    pub scripts: RestoreScripts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RestoreScripts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_restore: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_restore: Option<PathBuf>,
}

/// Database server to dump from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Database {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server: String,
    pub port: u16,
    pub credentials: DbCredentials,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: default_port(),
            credentials: DbCredentials::default(),
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DbCredentials {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// Default value functions

fn default_port() -> u16 { 3306 }
