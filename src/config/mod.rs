//! Configuration module for dump-targets
//!
//! This module handles loading and validating configuration documents (YAML,
//! or TOML by file extension) and decoding the named backup targets.
//!
//! ## Targets
//!
//! Each entry under `targets` carries a `type` (`s3`, `smb` or `file`) and a
//! `url`, plus the optional fields of that backend. Targets are turned into
//! storage handles on demand with [`Target::resolve`].
//!
//! ## Example Usage
//!
//! ```no_run
//! use dump_targets::config;
//!
//! let config = config::load_config("dump-targets.yaml")?;
//!
//! for name in &config.dump.targets {
//!     if let Some(target) = config.targets.get(name) {
//!         let storage = target.resolve()?;
//!         println!("{}: {}", name, storage.summary());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod loader;
mod schedule;
mod targets;
mod types;

pub use loader::{load_config, load_config_from_str, ConfigError, Format, Result};
pub use schedule::{Begin, Schedule, ScheduleError, ScheduleMode, DEFAULT_FREQUENCY};
pub use targets::{FileTarget, S3Target, SmbTarget, Target, TargetKind, Targets};
pub use types::*;

/// Expand tilde (~) in path
pub fn expand_tilde(path: &std::path::Path) -> std::path::PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
