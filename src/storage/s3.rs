//! S3-compatible object storage

use super::{non_empty, AwsCredentials, Storage};
use std::fmt;
use tracing::warn;
use url::Url;

/// Region used when a target does not set one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Endpoint AWS serves a region from
pub fn default_endpoint(region: &str) -> String {
    format!("https://s3.{}.amazonaws.com", region)
}

/// Where the S3 client gets its keys from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Keys set on the target
    Static { access_key_id: String },
    /// `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`, profile files, instance metadata
    Environment,
}

#[derive(Clone, PartialEq, Eq)]
pub struct S3Storage {
    url: Url,
    region: Option<String>,
    endpoint: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
}

impl S3Storage {
    pub fn builder(url: Url) -> S3StorageBuilder {
        S3StorageBuilder {
            storage: S3Storage {
                url,
                region: None,
                endpoint: None,
                access_key_id: None,
                secret_access_key: None,
            },
        }
    }

    /// Bucket name, taken from the URL host
    pub fn bucket(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Key prefix inside the bucket
    pub fn prefix(&self) -> &str {
        self.url.path().trim_start_matches('/')
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => default_endpoint(self.region()),
        }
    }

    pub fn has_custom_endpoint(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn credential_source(&self) -> CredentialSource {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(_)) => CredentialSource::Static {
                access_key_id: id.clone(),
            },
            _ => CredentialSource::Environment,
        }
    }

    pub fn access_key_id(&self) -> Option<&str> {
        self.access_key_id.as_deref()
    }

    pub fn secret_access_key(&self) -> Option<&str> {
        self.secret_access_key.as_deref()
    }
}

impl Storage for S3Storage {
    fn protocol(&self) -> &'static str {
        "s3"
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn summary(&self) -> String {
        let creds = match self.credential_source() {
            CredentialSource::Static { access_key_id } => format!("static key {}", access_key_id),
            CredentialSource::Environment => "environment".to_string(),
        };
        format!(
            "s3 bucket={} prefix={} region={} endpoint={} credentials={}",
            self.bucket(),
            self.prefix(),
            self.region(),
            self.endpoint(),
            creds
        )
    }
}

impl fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Storage")
            .field("url", &self.url.as_str())
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Applies overrides on top of the backend defaults
pub struct S3StorageBuilder {
    storage: S3Storage,
}

impl S3StorageBuilder {
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.storage.region = Some(region.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.storage.endpoint = Some(endpoint.into());
        self
    }

    pub fn access_key_id(mut self, id: impl Into<String>) -> Self {
        self.storage.access_key_id = Some(id.into());
        self
    }

    pub fn secret_access_key(mut self, secret: impl Into<String>) -> Self {
        self.storage.secret_access_key = Some(secret.into());
        self
    }

    /// Set whichever keys are present and non-empty
    pub fn with_credentials(mut self, creds: &AwsCredentials) -> Self {
        if let Some(id) = non_empty(&creds.access_key_id) {
            self = self.access_key_id(id);
        }
        if let Some(secret) = non_empty(&creds.secret_access_key) {
            self = self.secret_access_key(secret);
        }
        self
    }

    /// A key id without its secret (or the reverse) is dropped, so the
    /// handle falls back to environment credentials
    pub fn build(mut self) -> S3Storage {
        let storage = &mut self.storage;
        if storage.access_key_id.is_some() != storage.secret_access_key.is_some() {
            warn!(
                "Ignoring incomplete static credentials for s3://{}: access key id and secret access key must both be set",
                storage.bucket()
            );
            storage.access_key_id = None;
            storage.secret_access_key = None;
        }
        self.storage
    }
}
