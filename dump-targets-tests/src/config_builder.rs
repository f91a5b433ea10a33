//! Fluent API for building test configurations
//!
//! Provides a builder pattern for creating test configurations with sensible defaults.

use dump_targets::config::{
    Config, Database, DbCredentials, Dump, FileTarget, LogLevel, Restore, S3Target, Schedule,
    SmbTarget, Target, CONFIG_TYPE, CONFIG_VERSION,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct ConfigBuilder {
    temp_dir: TempDir,
    logging: LogLevel,
    dump: Dump,
    restore: Restore,
    database: Database,
    targets: Vec<(String, Target)>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with minimal defaults
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let database = Database {
            server: "db.test".to_string(),
            port: 3306,
            credentials: DbCredentials {
                username: "backup".to_string(),
                password: "test-password-123".to_string(),
            },
        };

        Self {
            temp_dir,
            logging: LogLevel::Info,
            dump: Dump::default(),
            restore: Restore::default(),
            database,
            targets: Vec::new(),
        }
    }

    /// Create a minimal config with a local file target that the dump writes to
    pub fn minimal() -> Self {
        let builder = Self::new();

        let backup_path = builder.temp_dir.path().join("backups");
        fs::create_dir_all(&backup_path).expect("Failed to create backup dir");

        builder
            .add_file_target("local", &backup_path)
            .dump_to(&["local"])
    }

    /// Set the logging level
    pub fn with_logging(mut self, level: LogLevel) -> Self {
        self.logging = level;
        self
    }

    /// Set the dump schedule
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.dump.schedule = schedule;
        self
    }

    /// Set the database server
    pub fn with_database(mut self, server: &str, port: u16) -> Self {
        self.database.server = server.to_string();
        self.database.port = port;
        self
    }

    /// Set the target names the dump uploads to
    pub fn dump_to(mut self, names: &[&str]) -> Self {
        self.dump.targets = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Add a local file target
    pub fn add_file_target(self, name: &str, path: &Path) -> Self {
        let url = path.display().to_string().replace('\\', "/");
        self.add_target(name, Target::File(FileTarget::new(url)))
    }

    /// Add an S3 target with backend defaults
    pub fn add_s3_target(self, name: &str, url: &str) -> Self {
        self.add_target(name, Target::S3(S3Target::new(url)))
    }

    /// Add an S3 target with a region and optional endpoint
    pub fn add_s3_target_in(self, name: &str, url: &str, region: &str, endpoint: Option<&str>) -> Self {
        let mut target = S3Target::new(url);
        target.region = Some(region.to_string());
        target.endpoint = endpoint.map(str::to_string);
        self.add_target(name, Target::S3(target))
    }

    /// Add an SMB target without credentials
    pub fn add_smb_target(self, name: &str, url: &str) -> Self {
        self.add_target(name, Target::Smb(SmbTarget::new(url)))
    }

    /// Add a target with custom settings
    pub fn add_target(mut self, name: &str, target: Target) -> Self {
        self.targets.push((name.to_string(), target));
        self
    }

    /// Get the temp directory path
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get a file target's directory
    pub fn target_path(&self, name: &str) -> Option<PathBuf> {
        self.targets
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .and_then(|(_, target)| match target {
                Target::File(file) => Some(PathBuf::from(&file.url)),
                _ => None,
            })
    }

    /// Build the Config
    pub fn build(self) -> Config {
        self.persist().0
    }

    /// Keep the temp directory (don't delete on drop)
    pub fn persist(self) -> (Config, TempDir) {
        let config = Config {
            config_type: CONFIG_TYPE.to_string(),
            version: CONFIG_VERSION.to_string(),
            logging: self.logging,
            dump: self.dump,
            restore: self.restore,
            database: self.database,
            targets: self.targets.into_iter().collect(),
        };
        (config, self.temp_dir)
    }

    /// Write the config as YAML into the temp directory
    pub fn write_yaml(self) -> (PathBuf, Config, TempDir) {
        let (config, temp_dir) = self.persist();
        let path = temp_dir.path().join("dump-targets.yaml");
        let yaml = config.to_yaml().expect("Failed to encode config");
        fs::write(&path, yaml).expect("Failed to write config");
        (path, config, temp_dir)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
