//! Wire client port for the external messaging protocol.
//!
//! The protocol itself (session encryption, multi-device pairing, socket
//! internals) lives entirely behind this contract. The gateway only needs
//! three capabilities: open a session with stored credentials, push text to
//! an address, and end the session cleanly. Session events flow back through
//! a channel as [`ConnectionEvent`]s.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::addressing::Jid;
use crate::domain::connection::{ConnectionEvent, CredentialBlob};

/// Options applied when establishing a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Device label shown in the account's linked-devices list.
    pub device_label: String,

    /// Whether the session advertises online presence on connect.
    pub mark_online: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            device_label: "CRM Gateway".to_string(),
            mark_online: false,
        }
    }
}

/// Errors surfaced by wire client implementations.
#[derive(Debug, Clone, Error)]
pub enum WireError {
    #[error("no active session")]
    NotConnected,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("protocol rejected the request: {0}")]
    Rejected(String),
}

/// Port for the external messaging protocol client.
///
/// Implementations own every protocol detail. Events for an established
/// session are delivered on the sender handed to [`WireClient::connect`]
/// until the session ends; dropping the sender ends the event stream.
#[async_trait]
pub trait WireClient: Send + Sync {
    /// Establish a session, resuming from `credentials` when present.
    ///
    /// Returns once the session attempt is underway; pairing, open and close
    /// are all reported asynchronously through `events`. An `Err` means the
    /// attempt never got off the ground.
    async fn connect(
        &self,
        credentials: Option<CredentialBlob>,
        options: SessionOptions,
        events: mpsc::UnboundedSender<ConnectionEvent>,
    ) -> Result<(), WireError>;

    /// Send a text message to a destination address. Single attempt.
    async fn send_text(&self, to: &Jid, body: &str) -> Result<(), WireError>;

    /// Best-effort clean teardown of the active session, if any.
    async fn end_session(&self);
}
