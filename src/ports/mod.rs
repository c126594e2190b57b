//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! gateway and the outside world. Adapters implement these ports.
//!
//! - `WireClient` - the external messaging protocol client
//! - `CredentialStore` - opaque session-key persistence

mod credential_store;
mod wire_client;

pub use credential_store::{CredentialStore, CredentialStoreError};
pub use wire_client::{SessionOptions, WireClient, WireError};
