//! Connection lifecycle manager.
//!
//! Owns the shared [`Connection`] and reacts to wire events: persisting
//! refreshed credentials, surfacing pairing codes, and deciding whether a
//! closed session gets a reconnect. The wire client's own recovery is not
//! enough on its own because a logged-out session must never be retried, so
//! the close reason is inspected here and the branch taken accordingly.
//!
//! Retries use two fixed delays with no backoff growth and no attempt cap;
//! they run until logout or process exit.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::connection::{
    CloseReason, Connection, ConnectionEvent, ConnectionSnapshot, RetryPlan,
};
use crate::ports::{CredentialStore, SessionOptions, WireClient};

/// Delay before reconnecting after a non-logout close.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Delay before retrying after failed session establishment.
const STARTUP_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Upper bound on clean session teardown at shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Tracks the messaging session across connects, drops and retries.
pub struct LifecycleManager {
    wire: Arc<dyn WireClient>,
    credentials: Arc<dyn CredentialStore>,
    options: SessionOptions,
    connection: Mutex<Connection>,
    pending_retry: Mutex<Option<JoinHandle<()>>>,
    // Weak self-handle so the event pump and retry timers can own a clone.
    handle: Weak<LifecycleManager>,
}

impl LifecycleManager {
    pub fn new(
        wire: Arc<dyn WireClient>,
        credentials: Arc<dyn CredentialStore>,
        options: SessionOptions,
    ) -> Arc<Self> {
        Arc::new_cyclic(|handle| Self {
            wire,
            credentials,
            options,
            connection: Mutex::new(Connection::new()),
            pending_retry: Mutex::new(None),
            handle: handle.clone(),
        })
    }

    /// Establish a session and start pumping its events.
    ///
    /// Safe to invoke repeatedly; retries do exactly that. Failures never
    /// propagate to the caller: they move the state to `error` and schedule
    /// the next attempt.
    pub async fn connect(&self) {
        let credentials = match self.credentials.load().await {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!(error = %e, "could not load stored credentials, starting unpaired");
                None
            }
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        match self
            .wire
            .connect(credentials, self.options.clone(), events_tx)
            .await
        {
            Ok(()) => {
                info!("wire session establishment started");
                self.spawn_event_pump(events_rx);
            }
            Err(e) => {
                error!(error = %e, "wire session establishment failed");
                self.handle_event(ConnectionEvent::StartupFailed).await;
            }
        }
    }

    /// Snapshot of the current state and pairing material. Pure read.
    pub fn current(&self) -> ConnectionSnapshot {
        self.lock_connection().snapshot()
    }

    /// True iff the session is connected and can carry messages.
    pub fn is_ready(&self) -> bool {
        self.lock_connection().is_ready()
    }

    /// Cancel pending retries and tear the session down, best-effort.
    ///
    /// Bounded by a grace period so a wedged wire client cannot block
    /// process exit.
    pub async fn shutdown(&self) {
        self.cancel_pending_retry();
        if tokio::time::timeout(SHUTDOWN_GRACE, self.wire.end_session())
            .await
            .is_err()
        {
            warn!("wire session teardown timed out, exiting anyway");
        }
    }

    fn spawn_event_pump(&self, mut events: mpsc::UnboundedReceiver<ConnectionEvent>) {
        let manager = self.strong();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                manager.handle_event(event).await;
            }
        });
    }

    async fn handle_event(&self, event: ConnectionEvent) {
        match &event {
            ConnectionEvent::PairingCodeIssued { .. } => {
                info!("pairing code issued, waiting for scan");
            }
            ConnectionEvent::Opened { identity } => {
                info!(account = %identity.id, "session opened");
            }
            ConnectionEvent::Closed { reason } => match reason {
                CloseReason::LoggedOut => warn!("session logged out, new pairing required"),
                CloseReason::Other(detail) => warn!(%detail, "session closed, will reconnect"),
            },
            ConnectionEvent::CredentialsUpdated { credentials } => {
                if let Err(e) = self.credentials.save(credentials).await {
                    warn!(error = %e, "failed to persist updated credentials");
                }
            }
            ConnectionEvent::MessageReceived { sender } => {
                info!(%sender, "inbound message received");
            }
            ConnectionEvent::StartupFailed => {}
        }

        let plan = self.lock_connection().apply(&event);

        match plan {
            RetryPlan::None => {
                // A logout also invalidates any reconnect already on the clock.
                if matches!(
                    event,
                    ConnectionEvent::Closed {
                        reason: CloseReason::LoggedOut
                    }
                ) {
                    self.cancel_pending_retry();
                }
            }
            RetryPlan::AfterClose => self.schedule_retry(RECONNECT_DELAY),
            RetryPlan::AfterFailure => self.schedule_retry(STARTUP_RETRY_DELAY),
        }
    }

    /// Schedule a single delayed reconnect, replacing any pending one.
    fn schedule_retry(&self, delay: Duration) {
        let manager = self.strong();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Forget our own handle before reconnecting, so a retry scheduled
            // from within this connect cannot abort the task running it.
            manager.lock_pending().take();
            manager.connect().await;
        });

        if let Some(previous) = self.lock_pending().replace(handle) {
            previous.abort();
        }
    }

    fn cancel_pending_retry(&self) {
        if let Some(pending) = self.lock_pending().take() {
            pending.abort();
        }
    }

    fn strong(&self) -> Arc<Self> {
        // `&self` only exists while some Arc is alive, so the upgrade holds.
        self.handle.upgrade().expect("lifecycle manager dropped")
    }

    fn lock_connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.connection.lock().expect("connection lock poisoned")
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending_retry.lock().expect("retry lock poisoned")
    }
}
