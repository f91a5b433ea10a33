//! Unit tests for the targets table
//!
//! Covers type dispatch, fields that do not apply to a backend, duplicate
//! names and deferred URL resolution.

use dump_targets::config::{load_config_from_str, ConfigError, Format, Target, TargetKind};
use dump_targets::storage::StorageError;
use rstest::rstest;
use test_utils::{
    all_kinds_yaml, duplicate_target_yaml, single_target_yaml, ConfigBuilder, OptionAssertions,
    ResultAssertions,
};

#[rstest]
#[case("s3", "s3://bucket/db", TargetKind::S3)]
#[case("smb", "smb://nas/share", TargetKind::Smb)]
#[case("file", "/var/backups", TargetKind::File)]
fn test_discriminator_selects_kind(
    #[case] kind: &str,
    #[case] url: &str,
    #[case] expected: TargetKind,
) {
    let config = load_config_from_str(&single_target_yaml(kind, url), Format::Yaml).assert_ok();

    let target = config.targets.get("only").assert_some();
    assert_eq!(target.kind(), expected);
    assert_eq!(target.url(), url);
    assert_eq!(target.resolve().assert_ok().protocol(), kind);
}

#[rstest]
#[case("ftp")]
#[case("S3")]
#[case("local")]
fn test_unknown_discriminator(#[case] kind: &str) {
    let doc = single_target_yaml(kind, "/var/backups");
    let err = load_config_from_str(&doc, Format::Yaml).unwrap_err();

    match err {
        ConfigError::UnknownTargetType { name, kind: found } => {
            assert_eq!(name, "only");
            assert_eq!(found, kind);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unknown_type_aborts_whole_table() {
    let doc = r#"
targets:
  good:
    type: file
    url: /var/backups
  bad:
    type: gcs
    url: gs://bucket
"#;
    load_config_from_str(doc, Format::Yaml)
        .assert_err_contains("Unknown target type 'gcs' for target 'bad'");
}

#[test]
fn test_missing_type_is_a_parse_error() {
    let doc = "targets:\n  only:\n    url: /var/backups\n";
    let err = load_config_from_str(doc, Format::Yaml).unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));
}

#[rstest]
#[case("smb", "smb://nas/share", "region: eu-west-1")]
#[case("smb", "smb://nas/share", "endpoint: https://minio")]
#[case("file", "/var/backups", "region: eu-west-1")]
#[case("file", "/var/backups", "credentials:\n      username: me")]
#[case("s3", "s3://bucket", "credentials:\n      username: me")]
#[case("smb", "smb://nas/share", "credentials:\n      access-key-id: AKIA")]
#[case("file", "/var/backups", "description: nightly")]
fn test_field_from_another_backend_is_ignored(
    #[case] kind: &str,
    #[case] url: &str,
    #[case] extra: &str,
) {
    let doc = format!(
        "targets:\n  only:\n    type: {}\n    url: \"{}\"\n    {}\n",
        kind, url, extra
    );
    let config = load_config_from_str(&doc, Format::Yaml).assert_ok();

    let target = config.targets.get("only").assert_some();
    assert_eq!(target.kind().as_str(), kind);
    assert_eq!(target.url(), url);

    let shown = config.to_yaml().assert_ok();
    assert!(!shown.contains("region"));
    assert!(!shown.contains("endpoint"));
    assert!(!shown.contains("access-key-id"));
    assert!(!shown.contains("username: me"));
    assert!(!shown.contains("description"));
}

#[test]
fn test_s3_target_drops_smb_login() {
    let doc = r#"
targets:
  offsite:
    type: s3
    url: s3://bucket
    region: eu-west-1
    credentials:
      access-key-id: AKIAEXAMPLE
      secret-access-key: secret
      domain: CORP
"#;
    let config = load_config_from_str(doc, Format::Yaml).assert_ok();

    match config.targets.get("offsite").assert_some() {
        Target::S3(s3) => {
            assert_eq!(s3.region.as_deref(), Some("eu-west-1"));
            assert_eq!(s3.credentials.access_key_id.as_deref(), Some("AKIAEXAMPLE"));
        }
        other => panic!("expected s3 target, got {:?}", other),
    }
}

#[test]
fn test_all_kinds_fixture() {
    let config = load_config_from_str(all_kinds_yaml(), Format::Yaml).assert_ok();

    let names: Vec<_> = config.targets.names().collect();
    assert_eq!(names, vec!["local", "nas", "offsite"]);

    match config.targets.get("nas").assert_some() {
        Target::Smb(smb) => {
            assert_eq!(smb.credentials.domain.as_deref(), Some("CORP"));
            assert_eq!(smb.credentials.username.as_deref(), Some("svc-backup"));
        }
        other => panic!("expected smb target, got {:?}", other),
    }
}

#[test]
fn test_duplicate_name_last_declaration_wins() {
    let config = load_config_from_str(duplicate_target_yaml(), Format::Yaml).assert_ok();

    assert_eq!(config.targets.len(), 1);
    let target = config.targets.get("main").assert_some();
    assert_eq!(target.kind(), TargetKind::File);
    assert_eq!(target.url(), "/second/path");
}

#[rstest]
#[case("file", "")]
#[case("file", "relative/dir")]
#[case("s3", "")]
#[case("smb", "not a url")]
fn test_bad_url_fails_only_on_resolve(#[case] kind: &str, #[case] url: &str) {
    let config = load_config_from_str(&single_target_yaml(kind, url), Format::Yaml).assert_ok();

    let target = config.targets.get("only").assert_some();
    let err = target.resolve().unwrap_err();
    assert!(
        matches!(err, StorageError::InvalidUrl { .. }),
        "unexpected error: {}",
        err
    );
}

#[test]
fn test_bad_url_does_not_affect_other_targets() {
    let config = ConfigBuilder::minimal()
        .add_s3_target("broken", "")
        .add_smb_target("nas", "smb://nas/share")
        .build();

    assert!(config.targets.get("broken").assert_some().resolve().is_err());
    assert!(config.targets.get("nas").assert_some().resolve().is_ok());
    assert!(config.targets.get("local").assert_some().resolve().is_ok());
}

#[test]
fn test_file_target_resolves_by_scheme() {
    let config =
        load_config_from_str(&single_target_yaml("file", "s3://bucket/x"), Format::Yaml)
            .assert_ok();

    let storage = config.targets.get("only").assert_some().resolve().assert_ok();
    assert_eq!(storage.protocol(), "s3");
}

#[test]
fn test_file_target_unsupported_scheme() {
    let config =
        load_config_from_str(&single_target_yaml("file", "ftp://host/x"), Format::Yaml)
            .assert_ok();

    let err = config.targets.get("only").assert_some().resolve().unwrap_err();
    assert!(matches!(err, StorageError::UnsupportedScheme(ref scheme) if scheme == "ftp"));
}

#[test]
fn test_resolve_returns_independent_handles() {
    let config = ConfigBuilder::minimal().build();
    let target = config.targets.get("local").assert_some();

    let first = target.resolve().assert_ok();
    let second = target.resolve().assert_ok();
    assert_eq!(first.url(), second.url());
    assert_eq!(first.summary(), second.summary());
}

#[test]
fn test_loaded_config_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<dump_targets::Config>();
    assert_send_sync::<Target>();
    assert_send_sync::<Box<dyn dump_targets::Storage>>();
}
