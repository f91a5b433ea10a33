use super::schedule::ScheduleError;
use super::targets::{TargetDeclarations, Targets};
use super::types::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unknown target type '{kind}' for target '{name}'")]
    UnknownTargetType { name: String, kind: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid dump schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    #[error("Failed to encode config: {0}")]
    SerializeError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Document syntax of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Toml,
}

impl Format {
    /// `.toml` files are TOML, everything else is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

/// The document as written, before targets are dispatched by type
#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "type", default)]
    config_type: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    logging: LogLevel,
    #[serde(default)]
    dump: Dump,
    #[serde(default)]
    restore: Restore,
    #[serde(default)]
    database: Database,
    #[serde(default)]
    targets: TargetDeclarations,
}

/// Load and validate configuration from a YAML or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!("Loading configuration from {:?}", path);
    load_config_from_str(&contents, Format::from_path(path))
}

/// Load and validate configuration from an in-memory document
pub fn load_config_from_str(contents: &str, format: Format) -> Result<Config> {
    let document: ConfigDocument = match format {
        Format::Yaml => serde_yaml::from_str(contents)?,
        Format::Toml => toml::from_str(contents)?,
    };
    build_config(document)
}

fn build_config(document: ConfigDocument) -> Result<Config> {
    let config_type = document.config_type.unwrap_or_else(|| CONFIG_TYPE.to_string());
    if config_type != CONFIG_TYPE {
        return Err(ConfigError::ValidationError(format!(
            "unsupported config type '{}' (expected '{}')",
            config_type, CONFIG_TYPE
        )));
    }

    let version = document.version.unwrap_or_else(|| CONFIG_VERSION.to_string());
    if version != CONFIG_VERSION {
        return Err(ConfigError::ValidationError(format!(
            "unsupported config version '{}' (expected '{}')",
            version, CONFIG_VERSION
        )));
    }

    document.dump.schedule.mode()?;

    let targets = Targets::from_declarations(document.targets)?;
    debug!("Loaded {} targets", targets.len());

    Ok(Config {
        config_type,
        version,
        logging: document.logging,
        dump: document.dump,
        restore: document.restore,
        database: document.database,
        targets,
    })
}

impl Config {
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}
