//! HTTP adapters - the CRM-facing REST API.
//!
//! Endpoint groups:
//! - `status` - liveness, connection state, pairing token
//! - `messaging` - outbound sends (current, legacy and diagnostic)

pub mod messaging;
pub mod status;

use std::sync::Arc;

use axum::Router;

use crate::application::{LifecycleManager, MessageDispatcher};

pub use messaging::messaging_routes;
pub use status::status_routes;

/// Shared handler state: the lifecycle manager for reads, the dispatcher for
/// sends.
#[derive(Clone)]
pub struct GatewayState {
    pub lifecycle: Arc<LifecycleManager>,
    pub dispatcher: Arc<MessageDispatcher>,
}

impl GatewayState {
    pub fn new(lifecycle: Arc<LifecycleManager>, dispatcher: Arc<MessageDispatcher>) -> Self {
        Self {
            lifecycle,
            dispatcher,
        }
    }
}

/// The complete gateway router with all endpoints mounted at the root,
/// matching the paths the CRM already calls.
pub fn gateway_router(state: GatewayState) -> Router {
    Router::new()
        .merge(status_routes())
        .merge(messaging_routes())
        .with_state(state)
}
