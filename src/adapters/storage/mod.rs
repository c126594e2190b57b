//! Storage adapters.
//!
//! File-backed implementation of the credential persistence port.

mod file_credential_store;

pub use file_credential_store::FileCredentialStore;
