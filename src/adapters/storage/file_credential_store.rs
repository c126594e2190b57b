//! File-backed credential store.
//!
//! Persists the opaque session-key blob under the configured auth directory
//! so restarts reconnect without a fresh pairing flow. The blob is written
//! verbatim; its format belongs to the wire client.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::domain::connection::CredentialBlob;
use crate::ports::{CredentialStore, CredentialStoreError};

const CREDENTIALS_FILE: &str = "creds.json";

/// Stores credentials as a single file inside a base directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    base_dir: PathBuf,
}

impl FileCredentialStore {
    /// Create a store rooted at `base_dir`. The directory is created lazily
    /// on the first save.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn credentials_path(&self) -> PathBuf {
        self.base_dir.join(CREDENTIALS_FILE)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<CredentialBlob>, CredentialStoreError> {
        match fs::read(self.credentials_path()).await {
            Ok(bytes) => Ok(Some(CredentialBlob::new(bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CredentialStoreError::Io(e.to_string())),
        }
    }

    async fn save(&self, credentials: &CredentialBlob) -> Result<(), CredentialStoreError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| CredentialStoreError::Io(e.to_string()))?;

        fs::write(self.credentials_path(), credentials.as_bytes())
            .await
            .map_err(|e| CredentialStoreError::Io(e.to_string()))
    }
}
