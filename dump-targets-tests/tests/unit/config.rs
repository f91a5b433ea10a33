//! Unit tests for configuration loading and validation
//!
//! These tests verify document parsing, defaults, schedule validation and
//! re-encoding.

use dump_targets::config::{
    load_config, load_config_from_str, Begin, Compression, ConfigError, Format, LogLevel,
    Schedule, ScheduleError, ScheduleMode,
};
use rstest::rstest;
use std::path::PathBuf;
use test_utils::{
    full_config_yaml, minimal_config_toml, ConfigBuilder, ResultAssertions, TestContext,
};

#[test]
fn test_full_document_fields() {
    let config = load_config_from_str(full_config_yaml(), Format::Yaml).assert_ok();

    assert_eq!(config.logging, LogLevel::Trace);
    assert_eq!(config.dump.include, vec!["shop", "users"]);
    assert_eq!(config.dump.exclude, vec!["sessions"]);
    assert!(config.dump.safechars);
    assert!(config.dump.no_database_name);
    assert!(config.dump.compact);
    assert_eq!(config.dump.compression, Compression::None);
    assert_eq!(config.dump.max_allowed_packet, Some(16777216));
    assert_eq!(config.dump.tmp_path, Some(PathBuf::from("/var/tmp/dumps")));
    assert_eq!(
        config.dump.filename_pattern.as_deref(),
        Some("{{ .dbname }}_{{ .now }}.sql")
    );
    assert_eq!(
        config.dump.scripts.pre_backup,
        Some(PathBuf::from("/etc/dump/pre-backup.sh"))
    );
    assert_eq!(
        config.restore.scripts.post_restore,
        Some(PathBuf::from("/etc/dump/post-restore.sh"))
    );
    assert_eq!(config.database.server, "mysql.internal");
    assert_eq!(config.database.port, 3307);
    assert_eq!(config.database.credentials.username, "dumper");
    assert_eq!(
        config.dump.schedule.mode().assert_ok(),
        ScheduleMode::Interval {
            frequency: 120,
            begin: Begin::AfterMinutes(15)
        }
    );
}

#[test]
fn test_database_password_not_in_debug_output() {
    let config = load_config_from_str(full_config_yaml(), Format::Yaml).assert_ok();
    let shown = format!("{:?}", config);
    assert!(!shown.contains("dump-password"));
    assert!(!shown.contains("s3-secret"));
}

#[rstest]
#[case("error", LogLevel::Error)]
#[case("warning", LogLevel::Warning)]
#[case("info", LogLevel::Info)]
#[case("debug", LogLevel::Debug)]
#[case("trace", LogLevel::Trace)]
fn test_logging_levels(#[case] raw: &str, #[case] expected: LogLevel) {
    let doc = format!("logging: {}\n", raw);
    let config = load_config_from_str(&doc, Format::Yaml).assert_ok();
    assert_eq!(config.logging, expected);
}

#[test]
fn test_logging_warn_is_not_accepted() {
    load_config_from_str("logging: warn\n", Format::Yaml).assert_err();
}

#[test]
fn test_unsupported_compression_rejected() {
    let doc = "dump:\n  compression: zstd\n";
    let err = load_config_from_str(doc, Format::Yaml).unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));
}

#[rstest]
#[case("once: true\n    cron: \"0 1 * * *\"")]
#[case("cron: \"0 1 * * *\"\n    frequency: 30")]
#[case("once: true\n    begin: \"0100\"")]
fn test_more_than_one_schedule_mode_fails(#[case] schedule: &str) {
    let doc = format!("dump:\n  schedule:\n    {}\n", schedule);
    let err = load_config_from_str(&doc, Format::Yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidSchedule(ScheduleError::Ambiguous(_))),
        "unexpected error: {}",
        err
    );
}

#[test]
fn test_builder_schedule_survives_reload() {
    let schedule = Schedule {
        cron: Some("30 4 * * 1-5".to_string()),
        ..Default::default()
    };
    let (path, config, _temp_dir) = ConfigBuilder::minimal().with_schedule(schedule).write_yaml();

    let loaded = load_config(&path).assert_ok();
    assert_eq!(loaded, config);
    assert_eq!(
        loaded.dump.schedule.mode().assert_ok(),
        ScheduleMode::Cron("30 4 * * 1-5".to_string())
    );
}

#[test]
fn test_yaml_round_trip_full_document() {
    let config = load_config_from_str(full_config_yaml(), Format::Yaml).assert_ok();
    let encoded = config.to_yaml().assert_ok();
    let decoded = load_config_from_str(&encoded, Format::Yaml).assert_ok();
    assert_eq!(config, decoded);
}

#[test]
fn test_toml_round_trip() {
    let config = ConfigBuilder::minimal()
        .add_s3_target_in("offsite", "s3://bucket", "eu-west-1", Some("https://minio:9000"))
        .add_smb_target("nas", "smb://nas/share")
        .with_logging(LogLevel::Debug)
        .build();

    let encoded = config.to_toml().assert_ok();
    assert!(toml::from_str::<toml::Value>(&encoded).is_ok());

    let decoded = load_config_from_str(&encoded, Format::Toml).assert_ok();
    assert_eq!(config, decoded);
}

#[test]
fn test_toml_file_by_extension() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", minimal_config_toml());

    let config = load_config(&path).assert_ok();
    assert_eq!(config.targets.len(), 1);
    assert_eq!(config.dump.targets, vec!["local"]);
}

#[test]
fn test_invalid_yaml_fails() {
    let ctx = TestContext::new();
    let path = ctx.create_config("targets: [unclosed");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));
}

#[test]
fn test_targets_must_be_a_map() {
    load_config_from_str("targets: [a, b]\n", Format::Yaml)
        .assert_err_contains("a map of target names to target declarations");
}

#[rstest]
#[case("targets:\n")]
#[case("targets: ~\n")]
#[case("targets: null\n")]
#[case("targets: {}\n")]
fn test_empty_targets_section(#[case] doc: &str) {
    let config = load_config_from_str(doc, Format::Yaml).assert_ok();
    assert!(config.targets.is_empty());
}

#[test]
fn test_cross_references_are_not_validated_on_load() {
    let config = ConfigBuilder::new().dump_to(&["ghost"]).build();
    let encoded = config.to_yaml().assert_ok();

    let loaded = load_config_from_str(&encoded, Format::Yaml).assert_ok();
    assert_eq!(loaded.missing_dump_targets(), vec!["ghost"]);
}
