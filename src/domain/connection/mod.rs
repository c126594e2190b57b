//! Connection lifecycle domain: state machine and the events that drive it.

mod events;
mod state;

pub use events::{CloseReason, ConnectionEvent, CredentialBlob, LinkedIdentity};
pub use state::{Connection, ConnectionSnapshot, ConnectionState, PairingMaterial, RetryPlan};
