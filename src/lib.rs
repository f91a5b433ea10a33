//! Dump Targets Library
//!
//! This library loads backup configuration documents and resolves their
//! named targets into storage handles.

pub mod config;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, Config, ConfigError, Target, TargetKind, Targets};
pub use logging::{init_logging, LoggingHandle};
pub use storage::{Storage, StorageError};
