//! Application layer - services orchestrating the domain through the ports.
//!
//! - `LifecycleManager` drives the connection state machine from wire events
//! - `MessageDispatcher` fronts the wire client's send primitive

mod dispatch;
mod lifecycle;

pub use dispatch::{MessageDispatcher, SendError};
pub use lifecycle::LifecycleManager;
