//! Backup targets
//!
//! The `targets` table maps a name to a declaration tagged with a `type`
//! discriminator. Each declaration is decoded once into a shape holding every
//! field any backend accepts, then narrowed to the backend named by its
//! discriminator. Fields the backend does not use are logged and dropped:
//!
//! | type  | backend          | optional fields                                          |
//! |-------|------------------|----------------------------------------------------------|
//! | `s3`  | object storage   | `region`, `endpoint`, `credentials.{access-key-id, secret-access-key}` |
//! | `smb` | network share    | `credentials.{domain, username, password}`               |
//! | `file`| local filesystem | none                                                     |
//!
//! Resolving a target into a storage handle is deferred until a job asks for
//! it, so a bad URL only fails that one resolution.

use super::loader::ConfigError;
use crate::storage::{
    self, non_empty, parse_url, smart_parse, AwsCredentials, Credentials, S3Storage, SmbCredentials,
    SmbStorage, Storage, StorageError,
};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

/// Backend kind, selected by the `type` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    S3,
    Smb,
    File,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::S3, TargetKind::Smb, TargetKind::File];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::S3 => "s3",
            TargetKind::Smb => "smb",
            TargetKind::File => "file",
        }
    }

    pub fn from_discriminator(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured backup destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Target {
    S3(S3Target),
    Smb(SmbTarget),
    File(FileTarget),
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::S3(_) => TargetKind::S3,
            Target::Smb(_) => TargetKind::Smb,
            Target::File(_) => TargetKind::File,
        }
    }

    /// URL exactly as declared
    pub fn url(&self) -> &str {
        match self {
            Target::S3(t) => &t.url,
            Target::Smb(t) => &t.url,
            Target::File(t) => &t.url,
        }
    }

    /// Build a new storage handle for this target
    ///
    /// Every call returns an independent handle.
    pub fn resolve(&self) -> storage::Result<Box<dyn Storage>> {
        match self {
            Target::S3(t) => Ok(Box::new(t.storage()?)),
            Target::Smb(t) => Ok(Box::new(t.storage()?)),
            Target::File(t) => t.storage(),
        }
    }
}

/// S3-compatible object storage target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3Target {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "AwsCredentials::is_empty")]
    pub credentials: AwsCredentials,
}

impl S3Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            region: None,
            endpoint: None,
            credentials: AwsCredentials::default(),
        }
    }

    /// Only fields that are set and non-empty override the backend defaults
    pub fn storage(&self) -> storage::Result<S3Storage> {
        let url = parse_target_url(&self.url)?;

        let mut builder = S3Storage::builder(url);
        if let Some(region) = non_empty(&self.region) {
            builder = builder.region(region);
        }
        if let Some(endpoint) = non_empty(&self.endpoint) {
            builder = builder.endpoint(endpoint);
        }
        Ok(builder.with_credentials(&self.credentials).build())
    }
}

/// SMB network share target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmbTarget {
    pub url: String,
    #[serde(skip_serializing_if = "SmbCredentials::is_empty")]
    pub credentials: SmbCredentials,
}

impl SmbTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: SmbCredentials::default(),
        }
    }

    pub fn storage(&self) -> storage::Result<SmbStorage> {
        let url = parse_target_url(&self.url)?;
        Ok(SmbStorage::builder(url)
            .with_credentials(&self.credentials)
            .build())
    }
}

/// Local directory target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTarget {
    pub url: String,
}

impl FileTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Resolved by URL scheme; local storage takes no credentials
    pub fn storage(&self) -> storage::Result<Box<dyn Storage>> {
        parse_url(&self.url, &Credentials::default())
    }
}

fn parse_target_url(raw: &str) -> storage::Result<Url> {
    smart_parse(raw).map_err(|source| StorageError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Named targets, keyed by target name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Targets(BTreeMap<String, Target>);

impl Targets {
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.0.iter().map(|(name, target)| (name.as_str(), target))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Turn raw declarations into targets, in document order
    ///
    /// A repeated name replaces the earlier declaration entirely. An unknown
    /// `type` aborts the whole table.
    pub(crate) fn from_declarations(declarations: TargetDeclarations) -> Result<Self, ConfigError> {
        let mut targets = BTreeMap::new();

        for (name, declaration) in declarations.0 {
            if name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "target names must not be empty".to_string(),
                ));
            }

            let target = declaration.into_target(&name)?;
            debug!("Decoded {} target '{}'", target.kind(), name);

            if targets.insert(name.clone(), target).is_some() {
                warn!("Target '{}' is declared more than once; the last declaration wins", name);
            }
        }

        Ok(Targets(targets))
    }
}

impl FromIterator<(String, Target)> for Targets {
    fn from_iter<I: IntoIterator<Item = (String, Target)>>(iter: I) -> Self {
        Targets(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = (&'a String, &'a Target);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The `targets` table as written, duplicates included
#[derive(Debug, Default)]
pub(crate) struct TargetDeclarations(Vec<(String, TargetDeclaration)>);

impl<'de> Deserialize<'de> for TargetDeclarations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DeclarationsVisitor;

        impl<'de> Visitor<'de> for DeclarationsVisitor {
            type Value = TargetDeclarations;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of target names to target declarations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, TargetDeclaration>()? {
                    entries.push(entry);
                }
                Ok(TargetDeclarations(entries))
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
                deserializer.deserialize_map(self)
            }

            // `targets:`, `targets: ~` and `targets: null` are an empty table
            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(TargetDeclarations::default())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(TargetDeclarations::default())
            }
        }

        deserializer.deserialize_option(DeclarationsVisitor)
    }
}

/// One entry of the `targets` table before its discriminator is checked
///
/// Keys no backend knows are collected so they can be reported and skipped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct TargetDeclaration {
    #[serde(rename = "type")]
    kind: String,
    url: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    credentials: Option<CredentialsDeclaration>,
    #[serde(flatten)]
    unknown: BTreeMap<String, IgnoredAny>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CredentialsDeclaration {
    #[serde(default)]
    access_key_id: Option<String>,
    #[serde(default)]
    secret_access_key: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, IgnoredAny>,
}

impl CredentialsDeclaration {
    fn aws_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("credentials.access-key-id", self.access_key_id.is_some()),
            ("credentials.secret-access-key", self.secret_access_key.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
    }

    fn smb_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("credentials.domain", self.domain.is_some()),
            ("credentials.username", self.username.is_some()),
            ("credentials.password", self.password.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
    }
}

fn skip_field(name: &str, kind: TargetKind, field: &str) {
    warn!(
        "Target '{}': field '{}' does not apply to {} targets; ignoring it",
        name, field, kind
    );
}

impl TargetDeclaration {
    /// Dispatch on the discriminator and keep only the fields the chosen
    /// backend understands; anything else is logged and dropped
    fn into_target(self, name: &str) -> Result<Target, ConfigError> {
        let kind = TargetKind::from_discriminator(&self.kind).ok_or_else(|| {
            ConfigError::UnknownTargetType {
                name: name.to_string(),
                kind: self.kind.clone(),
            }
        })?;

        for field in self.unknown.keys() {
            warn!("Target '{}': ignoring unknown field '{}'", name, field);
        }
        if let Some(credentials) = &self.credentials {
            for field in credentials.unknown.keys() {
                warn!("Target '{}': ignoring unknown field 'credentials.{}'", name, field);
            }
        }

        match kind {
            TargetKind::S3 => {
                let credentials = self.credentials.unwrap_or_default();
                credentials.smb_fields().for_each(|field| skip_field(name, kind, field));
                Ok(Target::S3(S3Target {
                    url: self.url,
                    region: self.region,
                    endpoint: self.endpoint,
                    credentials: AwsCredentials {
                        access_key_id: credentials.access_key_id,
                        secret_access_key: credentials.secret_access_key,
                    },
                }))
            }
            TargetKind::Smb => {
                if self.region.is_some() {
                    skip_field(name, kind, "region");
                }
                if self.endpoint.is_some() {
                    skip_field(name, kind, "endpoint");
                }
                let credentials = self.credentials.unwrap_or_default();
                credentials.aws_fields().for_each(|field| skip_field(name, kind, field));
                Ok(Target::Smb(SmbTarget {
                    url: self.url,
                    credentials: SmbCredentials {
                        domain: credentials.domain,
                        username: credentials.username,
                        password: credentials.password,
                    },
                }))
            }
            TargetKind::File => {
                if self.region.is_some() {
                    skip_field(name, kind, "region");
                }
                if self.endpoint.is_some() {
                    skip_field(name, kind, "endpoint");
                }
                if self.credentials.is_some() {
                    skip_field(name, kind, "credentials");
                }
                Ok(Target::File(FileTarget { url: self.url }))
            }
        }
    }
}
