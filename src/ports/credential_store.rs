//! Credential persistence port.
//!
//! Session keys must survive restarts so the gateway reconnects without a new
//! pairing flow. The blob is opaque; the store only moves bytes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::connection::CredentialBlob;

/// Errors from credential persistence.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("credential I/O failed: {0}")]
    Io(String),
}

/// Port for persisting session credentials across restarts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load previously saved credentials, `None` when nothing was saved yet.
    async fn load(&self) -> Result<Option<CredentialBlob>, CredentialStoreError>;

    /// Persist the latest credentials, replacing any previous ones.
    ///
    /// Invoked on every credentials-changed event from the wire client.
    async fn save(&self, credentials: &CredentialBlob) -> Result<(), CredentialStoreError>;
}
