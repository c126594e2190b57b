//! In-process loopback wire client.
//!
//! Implements [`WireClient`] without any network: sends are recorded and
//! logged instead of delivered. Serves two roles:
//!
//! - default transport for local development, so the CRM can integrate
//!   against the HTTP API before a real protocol client is wired in;
//! - scripted test double with error injection and a sent-message log.
//!
//! In auto-open mode (the default) a connect immediately reports an opened
//! session, minting credentials for fresh sessions. `manual()` suppresses
//! that so tests can drive the event stream themselves via [`LoopbackWireClient::emit`].

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::domain::addressing::Jid;
use crate::domain::connection::{ConnectionEvent, CredentialBlob, LinkedIdentity};
use crate::ports::{SessionOptions, WireClient, WireError};

/// A message accepted by the loopback transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: Jid,
    pub body: String,
}

#[derive(Default)]
struct LoopbackState {
    events: Option<mpsc::UnboundedSender<ConnectionEvent>>,
    session_open: bool,
    connect_calls: u32,
    sent: Vec<SentMessage>,
    next_connect_error: Option<WireError>,
    next_send_error: Option<WireError>,
}

/// Loopback implementation of the wire client port.
pub struct LoopbackWireClient {
    auto_open: bool,
    state: Mutex<LoopbackState>,
}

impl LoopbackWireClient {
    /// Loopback that auto-opens a session on every successful connect.
    pub fn new() -> Self {
        Self {
            auto_open: true,
            state: Mutex::new(LoopbackState::default()),
        }
    }

    /// Loopback that emits nothing on its own; tests drive events via [`Self::emit`].
    pub fn manual() -> Self {
        Self {
            auto_open: false,
            state: Mutex::new(LoopbackState::default()),
        }
    }

    /// Deliver an event on the current session's stream.
    ///
    /// # Panics
    ///
    /// Panics if no session was connected; that is a test wiring mistake.
    pub fn emit(&self, event: ConnectionEvent) {
        let sender = self
            .lock()
            .events
            .clone()
            .expect("loopback: no active event stream");
        let _ = sender.send(event);
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.lock().sent.clone()
    }

    /// How many times `connect` was invoked.
    pub fn connect_calls(&self) -> u32 {
        self.lock().connect_calls
    }

    pub fn is_session_open(&self) -> bool {
        self.lock().session_open
    }

    /// Make the next `connect` fail with `error`.
    pub fn fail_next_connect(&self, error: WireError) {
        self.lock().next_connect_error = Some(error);
    }

    /// Make the next `send_text` fail with `error`.
    pub fn fail_next_send(&self, error: WireError) {
        self.lock().next_send_error = Some(error);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoopbackState> {
        self.state.lock().expect("loopback state lock poisoned")
    }
}

impl Default for LoopbackWireClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WireClient for LoopbackWireClient {
    async fn connect(
        &self,
        credentials: Option<CredentialBlob>,
        options: SessionOptions,
        events: mpsc::UnboundedSender<ConnectionEvent>,
    ) -> Result<(), WireError> {
        {
            let mut state = self.lock();
            state.connect_calls += 1;
            if let Some(error) = state.next_connect_error.take() {
                return Err(error);
            }
            state.events = Some(events.clone());
            state.session_open = true;
        }

        if self.auto_open {
            // Fresh sessions mint credentials; resumed ones reuse the blob.
            if credentials.is_none() {
                let _ = events.send(ConnectionEvent::CredentialsUpdated {
                    credentials: CredentialBlob::new(b"loopback-session-keys".to_vec()),
                });
            }
            let _ = events.send(ConnectionEvent::Opened {
                identity: LinkedIdentity {
                    id: format!("loopback:{}", options.device_label),
                    name: Some(options.device_label),
                },
            });
        }

        Ok(())
    }

    async fn send_text(&self, to: &Jid, body: &str) -> Result<(), WireError> {
        let mut state = self.lock();
        if !state.session_open {
            return Err(WireError::NotConnected);
        }
        if let Some(error) = state.next_send_error.take() {
            return Err(error);
        }
        state.sent.push(SentMessage {
            to: to.clone(),
            body: body.to_string(),
        });
        info!(to = %to, "loopback transport accepted message (logged, not delivered)");
        Ok(())
    }

    async fn end_session(&self) {
        let mut state = self.lock();
        state.session_open = false;
        state.events = None;
    }
}
