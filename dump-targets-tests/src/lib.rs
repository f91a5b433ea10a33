//! Test utilities for dump-targets
//!
//! This crate provides shared test utilities, document fixtures,
//! and helper functions for testing the dump-targets library.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_utils::{ConfigBuilder, TestContext};
//!
//! #[test]
//! fn my_test() {
//!     let config = ConfigBuilder::minimal()
//!         .add_s3_target("offsite", "s3://bucket/db")
//!         .build();
//!     // ... test code
//! }
//! ```

pub mod config_builder;
pub mod fixtures;
pub mod test_context;

// Re-export commonly used items
pub use config_builder::ConfigBuilder;
pub use fixtures::*;
pub use test_context::{OptionAssertions, ResultAssertions, TestContext};

// Re-export types from the main crate for convenience
pub use dump_targets::config::{
    Config, ConfigError, Database, Dump, FileTarget, Format, LogLevel, S3Target, Schedule,
    SmbTarget, Target, TargetKind, Targets,
};
pub use dump_targets::storage::{AwsCredentials, SmbCredentials, Storage, StorageError};

/// Common test result type
pub type TestResult<T = ()> = anyhow::Result<T>;
