//! Tests for the 'resolve' command
//!
//! The resolve command builds a storage handle for one or all targets and
//! prints a summary of each.

use dump_targets::config::{S3Target, Target};
use test_utils::{ConfigBuilder, OptionAssertions, ResultAssertions};

#[test]
fn test_resolve_single_target() {
    let builder = ConfigBuilder::minimal();
    let expected = builder.target_path("local").assert_some();
    let config = builder.build();

    let storage = config.targets.get("local").assert_some().resolve().assert_ok();
    assert_eq!(storage.protocol(), "file");
    assert!(storage.summary().contains(&expected.display().to_string()));
}

#[test]
fn test_resolve_all_collects_failures() {
    let config = ConfigBuilder::minimal()
        .add_s3_target("offsite", "s3://bucket")
        .add_file_target("broken", std::path::Path::new("relative/path"))
        .build();

    let failed: Vec<_> = config
        .targets
        .iter()
        .filter(|(_, target)| target.resolve().is_err())
        .map(|(name, _)| name)
        .collect();
    assert_eq!(failed, vec!["broken"]);
}

#[test]
fn test_resolve_summary_hides_secrets() {
    let mut target = S3Target::new("s3://bucket/db");
    target.credentials.access_key_id = Some("AKIAEXAMPLE".to_string());
    target.credentials.secret_access_key = Some("very-secret".to_string());
    let config = ConfigBuilder::new()
        .add_target("offsite", Target::S3(target))
        .build();

    let summary = config
        .targets
        .get("offsite")
        .assert_some()
        .resolve()
        .assert_ok()
        .summary();
    assert!(summary.contains("static key AKIAEXAMPLE"));
    assert!(!summary.contains("very-secret"));
}

#[test]
fn test_resolve_unknown_name() {
    let config = ConfigBuilder::minimal().build();
    config.targets.get("nowhere").assert_none();
}
