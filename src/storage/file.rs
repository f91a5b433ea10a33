//! Local filesystem storage

use super::Storage;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    url: Url,
    path: PathBuf,
}

impl FileStorage {
    pub fn new(url: Url) -> Self {
        // A host part (`file://backups/x`) is not a local path; keep the raw path then
        let path = url
            .to_file_path()
            .unwrap_or_else(|_| PathBuf::from(url.path()));
        Self { url, path }
    }

    /// Directory dumps are written to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn protocol(&self) -> &'static str {
        "file"
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn summary(&self) -> String {
        format!("file path={}", self.path.display())
    }
}
