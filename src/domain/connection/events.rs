//! Events driving the connection lifecycle.
//!
//! The wire client delivers session events through this single enum so the
//! state machine stays independent of how the underlying protocol library
//! surfaces them (callback, channel, or polled queue).

use serde::Serialize;

/// Opaque credential material persisted across restarts.
///
/// The gateway never inspects the contents; it only shuttles the bytes
/// between the wire client and the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialBlob(Vec<u8>);

impl CredentialBlob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// The account a session is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedIdentity {
    /// Protocol-level account identifier.
    pub id: String,

    /// Display name, when the network reports one.
    pub name: Option<String>,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The account was logged out remotely. A new pairing flow is required;
    /// reconnecting with the same credentials would loop forever.
    LoggedOut,

    /// Any other interruption (socket drop, stream error, server restart).
    Other(String),
}

impl CloseReason {
    pub fn is_logout(&self) -> bool {
        matches!(self, CloseReason::LoggedOut)
    }
}

/// A single lifecycle event.
///
/// The first five variants are emitted by the wire client. `StartupFailed`
/// is synthesized by the lifecycle manager itself when session establishment
/// fails before any events could flow.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// A pairing code was issued and is waiting to be scanned.
    PairingCodeIssued { code: String },

    /// The session authenticated and is ready to carry messages.
    Opened { identity: LinkedIdentity },

    /// The session ended.
    Closed { reason: CloseReason },

    /// The session keys changed and must be persisted.
    CredentialsUpdated { credentials: CredentialBlob },

    /// An inbound message arrived (logged only; the gateway sends, it does
    /// not consume).
    MessageReceived { sender: String },

    /// Session establishment itself failed.
    StartupFailed,
}
