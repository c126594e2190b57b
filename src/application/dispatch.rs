//! Message dispatch facade.
//!
//! Normalizes a destination phone number into a protocol address and forwards
//! the send to the wire client. Sends are a single attempt with no queueing:
//! while the session is down the message is dropped with a structured
//! failure, never buffered.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::LifecycleManager;
use crate::domain::addressing::Jid;
use crate::ports::{WireClient, WireError};

/// Failures surfaced to HTTP callers as `{success: false, error}`.
#[derive(Debug, Clone, Error)]
pub enum SendError {
    /// The session is not connected; scan the pairing code first.
    #[error("not connected")]
    NotConnected,

    /// The wire client rejected or failed the send.
    #[error("message could not be sent: {0}")]
    Wire(#[from] WireError),
}

/// Facade in front of the wire client's send primitive.
pub struct MessageDispatcher {
    wire: Arc<dyn WireClient>,
    lifecycle: Arc<LifecycleManager>,
}

impl MessageDispatcher {
    pub fn new(wire: Arc<dyn WireClient>, lifecycle: Arc<LifecycleManager>) -> Self {
        Self { wire, lifecycle }
    }

    /// Send `body` to the (raw) phone number `phone`.
    ///
    /// Fast-fails without touching the wire when the session is not ready.
    pub async fn send_text(&self, phone: &str, body: &str) -> Result<(), SendError> {
        if !self.lifecycle.is_ready() {
            return Err(SendError::NotConnected);
        }

        let to = Jid::from_phone(phone);
        match self.wire.send_text(&to, body).await {
            Ok(()) => {
                info!(%to, "message dispatched");
                Ok(())
            }
            Err(e) => {
                warn!(%to, error = %e, "message dispatch failed");
                Err(e.into())
            }
        }
    }

    /// Canned diagnostic message for the `/test` endpoint.
    pub fn diagnostic_message() -> String {
        format!(
            "Test message\n\n\
             Hello! This is a diagnostic message from the CRM gateway.\n\n\
             Date: {}\n\
             If you received this, the messaging integration is working.",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )
    }
}
