//! Connection lifecycle state machine.
//!
//! One transition function consumes [`ConnectionEvent`]s and mutates the
//! state and pairing material atomically, returning what (if anything) the
//! caller should schedule next. All transitions are legal from every state;
//! the interesting branch is the close reason, since a logged-out session
//! must never be retried.

use serde::Serialize;

use super::events::{CloseReason, ConnectionEvent, LinkedIdentity};

/// Current phase of the messaging session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No session yet; initial state at process start.
    Disconnected,

    /// A pairing code is waiting to be scanned.
    QrRequired,

    /// Authenticated and ready to send.
    Connected,

    /// Session dropped; a reconnect is scheduled.
    Reconnecting,

    /// The account was logged out; only a new pairing flow recovers this.
    LoggedOut,

    /// Session establishment failed; a retry is scheduled.
    Error,
}

impl ConnectionState {
    /// Wire-format name, matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::QrRequired => "qr_required",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
            ConnectionState::LoggedOut => "logged_out",
            ConnectionState::Error => "error",
        }
    }
}

/// Pairing token and authenticated identity, both nullable.
///
/// The identity is only meaningful while the state is [`ConnectionState::Connected`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingMaterial {
    /// Most recent pairing code, present while a scan is pending.
    pub code: Option<String>,

    /// Account the session is authenticated as.
    pub identity: Option<LinkedIdentity>,
}

/// What the lifecycle manager should schedule after applying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPlan {
    /// Nothing to schedule.
    None,

    /// Reconnect after the fixed post-disconnect delay.
    AfterClose,

    /// Reconnect after the fixed post-failure delay.
    AfterFailure,
}

/// Mutable connection status: state plus pairing material, updated together.
#[derive(Debug, Clone)]
pub struct Connection {
    state: ConnectionState,
    pairing: PairingMaterial,
}

impl Connection {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            pairing: PairingMaterial::default(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn pairing(&self) -> &PairingMaterial {
        &self.pairing
    }

    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Apply a lifecycle event, returning the retry the caller must schedule.
    ///
    /// `CredentialsUpdated` and `MessageReceived` leave the state untouched;
    /// their side effects (persistence, logging) belong to the caller.
    pub fn apply(&mut self, event: &ConnectionEvent) -> RetryPlan {
        match event {
            ConnectionEvent::PairingCodeIssued { code } => {
                self.state = ConnectionState::QrRequired;
                self.pairing.code = Some(code.clone());
                self.pairing.identity = None;
                RetryPlan::None
            }
            ConnectionEvent::Opened { identity } => {
                self.state = ConnectionState::Connected;
                self.pairing.code = None;
                self.pairing.identity = Some(identity.clone());
                RetryPlan::None
            }
            ConnectionEvent::Closed { reason } => {
                if reason.is_logout() {
                    self.state = ConnectionState::LoggedOut;
                    self.pairing.code = None;
                    self.pairing.identity = None;
                    RetryPlan::None
                } else {
                    self.state = ConnectionState::Reconnecting;
                    RetryPlan::AfterClose
                }
            }
            ConnectionEvent::StartupFailed => {
                self.state = ConnectionState::Error;
                RetryPlan::AfterFailure
            }
            ConnectionEvent::CredentialsUpdated { .. }
            | ConnectionEvent::MessageReceived { .. } => RetryPlan::None,
        }
    }

    /// Point-in-time copy for HTTP handlers.
    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            state: self.state,
            code: self.pairing.code.clone(),
            identity: self.pairing.identity.clone(),
        }
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of the connection status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub state: ConnectionState,
    pub code: Option<String>,
    pub identity: Option<LinkedIdentity>,
}

impl ConnectionSnapshot {
    pub fn is_ready(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [ConnectionState; 6] = [
        ConnectionState::Disconnected,
        ConnectionState::QrRequired,
        ConnectionState::Connected,
        ConnectionState::Reconnecting,
        ConnectionState::LoggedOut,
        ConnectionState::Error,
    ];

    fn identity() -> LinkedIdentity {
        LinkedIdentity {
            id: "905001112233".to_string(),
            name: Some("CRM Bot".to_string()),
        }
    }

    fn connection_in(state: ConnectionState) -> Connection {
        let mut conn = Connection::new();
        // Drive the machine into the requested state through real events.
        match state {
            ConnectionState::Disconnected => {}
            ConnectionState::QrRequired => {
                conn.apply(&ConnectionEvent::PairingCodeIssued {
                    code: "2@abc".to_string(),
                });
            }
            ConnectionState::Connected => {
                conn.apply(&ConnectionEvent::Opened { identity: identity() });
            }
            ConnectionState::Reconnecting => {
                conn.apply(&ConnectionEvent::Closed {
                    reason: CloseReason::Other("stream error".to_string()),
                });
            }
            ConnectionState::LoggedOut => {
                conn.apply(&ConnectionEvent::Closed {
                    reason: CloseReason::LoggedOut,
                });
            }
            ConnectionState::Error => {
                conn.apply(&ConnectionEvent::StartupFailed);
            }
        }
        assert_eq!(conn.state(), state);
        conn
    }

    #[test]
    fn starts_disconnected_with_empty_pairing() {
        let conn = Connection::new();
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(conn.pairing().code, None);
        assert_eq!(conn.pairing().identity, None);
        assert!(!conn.is_ready());
    }

    #[test]
    fn logout_from_any_state_never_plans_a_retry() {
        for state in ALL_STATES {
            let mut conn = connection_in(state);
            let plan = conn.apply(&ConnectionEvent::Closed {
                reason: CloseReason::LoggedOut,
            });
            assert_eq!(plan, RetryPlan::None, "from {state:?}");
            assert_eq!(conn.state(), ConnectionState::LoggedOut, "from {state:?}");
            assert_eq!(conn.pairing().code, None);
            assert_eq!(conn.pairing().identity, None);
        }
    }

    #[test]
    fn non_logout_close_from_any_state_plans_exactly_one_reconnect() {
        for state in ALL_STATES {
            let mut conn = connection_in(state);
            let plan = conn.apply(&ConnectionEvent::Closed {
                reason: CloseReason::Other("connection reset".to_string()),
            });
            assert_eq!(plan, RetryPlan::AfterClose, "from {state:?}");
            assert_eq!(conn.state(), ConnectionState::Reconnecting, "from {state:?}");
        }
    }

    #[test]
    fn pairing_code_stores_token_and_clears_identity() {
        let mut conn = connection_in(ConnectionState::Connected);
        let plan = conn.apply(&ConnectionEvent::PairingCodeIssued {
            code: "2@fresh".to_string(),
        });
        assert_eq!(plan, RetryPlan::None);
        assert_eq!(conn.state(), ConnectionState::QrRequired);
        assert_eq!(conn.pairing().code.as_deref(), Some("2@fresh"));
        assert_eq!(conn.pairing().identity, None);
    }

    #[test]
    fn open_clears_code_and_stores_identity() {
        let mut conn = connection_in(ConnectionState::QrRequired);
        conn.apply(&ConnectionEvent::Opened { identity: identity() });
        assert_eq!(conn.state(), ConnectionState::Connected);
        assert!(conn.is_ready());
        assert_eq!(conn.pairing().code, None);
        assert_eq!(conn.pairing().identity, Some(identity()));
    }

    #[test]
    fn startup_failure_plans_the_slower_retry() {
        for state in ALL_STATES {
            let mut conn = connection_in(state);
            let plan = conn.apply(&ConnectionEvent::StartupFailed);
            assert_eq!(plan, RetryPlan::AfterFailure, "from {state:?}");
            assert_eq!(conn.state(), ConnectionState::Error, "from {state:?}");
        }
    }

    #[test]
    fn credentials_and_inbound_messages_do_not_move_the_machine() {
        let mut conn = connection_in(ConnectionState::Connected);
        let before = conn.snapshot();

        let plan = conn.apply(&ConnectionEvent::CredentialsUpdated {
            credentials: crate::domain::connection::CredentialBlob::new(vec![1, 2, 3]),
        });
        assert_eq!(plan, RetryPlan::None);

        let plan = conn.apply(&ConnectionEvent::MessageReceived {
            sender: "905321234567@s.whatsapp.net".to_string(),
        });
        assert_eq!(plan, RetryPlan::None);
        assert_eq!(conn.snapshot(), before);
    }

    #[test]
    fn reconnecting_keeps_pairing_material() {
        // A mid-session drop should not wipe the identity the UI shows;
        // only logout or a fresh pairing code does that.
        let mut conn = connection_in(ConnectionState::Connected);
        conn.apply(&ConnectionEvent::Closed {
            reason: CloseReason::Other("socket closed".to_string()),
        });
        assert_eq!(conn.pairing().identity, Some(identity()));
    }

    #[test]
    fn state_serializes_in_snake_case() {
        let json = serde_json::to_string(&ConnectionState::QrRequired).unwrap();
        assert_eq!(json, "\"qr_required\"");
        assert_eq!(ConnectionState::LoggedOut.as_str(), "logged_out");
    }
}
