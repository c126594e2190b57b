//! Routes for liveness and connection status.

use axum::{routing::get, Router};

use crate::adapters::http::GatewayState;

use super::handlers::{health, qr, status};

pub fn status_routes() -> Router<GatewayState> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/qr", get(qr))
}
