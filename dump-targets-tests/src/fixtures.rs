//! Test fixtures and sample data
//!
//! Provides pre-built configuration documents for testing.

/// One target of every supported kind
pub fn all_kinds_yaml() -> &'static str {
    r#"
type: config.databack.io
version: "1"
targets:
  offsite:
    type: s3
    url: s3://backups/mysql
    region: us-east-1
  nas:
    type: smb
    url: smb://nas/backups
    credentials:
      domain: CORP
      username: svc-backup
      password: nas-password
  local:
    type: file
    url: /var/backups
"#
}

/// Every section of the document filled in
pub fn full_config_yaml() -> &'static str {
    r#"
type: config.databack.io
version: "1"
logging: trace
dump:
  include: [shop, users]
  exclude: [sessions]
  safechars: true
  no-database-name: true
  schedule:
    frequency: 120
    begin: "+15"
  compression: none
  compact: true
  max-allowed-packet: 16777216
  tmp-path: /var/tmp/dumps
  filename-pattern: "{{ .dbname }}_{{ .now }}.sql"
  scripts:
    pre-backup: /etc/dump/pre-backup.sh
    post-backup: /etc/dump/post-backup.sh
  targets: [offsite, nas]
restore:
  scripts:
    pre-restore: /etc/dump/pre-restore.sh
    post-restore: /etc/dump/post-restore.sh
database:
  server: mysql.internal
  port: 3307
  credentials:
    username: dumper
    password: dump-password
targets:
  offsite:
    type: s3
    url: s3://backups/mysql
    region: eu-west-1
    endpoint: https://minio.internal:9000
    credentials:
      access-key-id: AKIAEXAMPLE
      secret-access-key: s3-secret
  nas:
    type: smb
    url: smb://nas/backups/mysql
    credentials:
      username: svc-backup
"#
}

/// The same name declared twice with different kinds
pub fn duplicate_target_yaml() -> &'static str {
    r#"
targets:
  main:
    type: s3
    url: s3://first-bucket
    region: us-west-2
    credentials:
      access-key-id: FIRST
  main:
    type: file
    url: /second/path
"#
}

/// A single target with the given discriminator
pub fn single_target_yaml(kind: &str, url: &str) -> String {
    format!(
        r#"
targets:
  only:
    type: {}
    url: "{}"
"#,
        kind, url
    )
}

/// Minimal valid config in TOML
pub fn minimal_config_toml() -> &'static str {
    r#"
type = "config.databack.io"
version = "1"

[dump]
targets = ["local"]

[targets.local]
type = "file"
url = "/var/backups"
"#
}
