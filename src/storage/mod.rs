//! Storage backends for backup targets
//!
//! A storage handle is the live side of a configured target. Handles are built
//! either directly by a backend builder (S3, SMB) or through [`parse_url`],
//! which picks the backend from the URL scheme.
//!
//! Handles only carry their resolved settings here; transfers happen in the
//! dump/restore pipeline that owns the handle.

pub mod credentials;
pub mod file;
pub mod s3;
pub mod smb;

use std::fmt;

use tracing::debug;
use url::Url;

pub use credentials::{AwsCredentials, Credentials, SmbCredentials};
pub use file::FileStorage;
pub use s3::S3Storage;
pub use smb::SmbStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid target url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported storage scheme: {0}")]
    UnsupportedScheme(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A resolved, ready-to-use storage destination
pub trait Storage: fmt::Debug + Send + Sync {
    /// URL scheme handled by this backend (`s3`, `smb`, `file`)
    fn protocol(&self) -> &'static str;

    /// The parsed URL the handle was built from
    fn url(&self) -> &Url;

    /// One-line human readable description with secrets removed
    fn summary(&self) -> String;
}

/// Parse a target URL, accepting bare absolute paths as `file://` URLs
pub fn smart_parse(raw: &str) -> std::result::Result<Url, url::ParseError> {
    if !raw.contains("://") && raw.starts_with('/') {
        return Url::parse(&format!("file://{}", raw));
    }
    Url::parse(raw)
}

/// Resolve a URL into a storage handle, choosing the backend by scheme
///
/// Credentials only apply to the backend they belong to; empty fields are
/// ignored so the backend keeps its own defaults.
pub fn parse_url(raw: &str, credentials: &Credentials) -> Result<Box<dyn Storage>> {
    let url = smart_parse(raw).map_err(|source| StorageError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    debug!("Resolving storage for scheme '{}'", url.scheme());

    match url.scheme() {
        "file" => Ok(Box::new(FileStorage::new(url))),
        "s3" => Ok(Box::new(
            S3Storage::builder(url)
                .with_credentials(&credentials.aws)
                .build(),
        )),
        "smb" => Ok(Box::new(
            SmbStorage::builder(url)
                .with_credentials(&credentials.smb)
                .build(),
        )),
        other => Err(StorageError::UnsupportedScheme(other.to_string())),
    }
}

/// Treat a present-but-empty value the same as an absent one
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Render a URL without its password component
pub(crate) fn redacted(url: &Url) -> String {
    if url.password().is_none() {
        return url.to_string();
    }
    let mut clean = url.clone();
    // Only fails for cannot-be-a-base URLs, which never carry a password
    let _ = clean.set_password(Some("***"));
    clean.to_string()
}
