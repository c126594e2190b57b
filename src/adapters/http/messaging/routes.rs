//! Routes for the send endpoints.

use axum::{routing::post, Router};

use crate::adapters::http::GatewayState;

use super::handlers::{send_legacy, send_message, send_test};

pub fn messaging_routes() -> Router<GatewayState> {
    Router::new()
        .route("/send-message", post(send_message))
        .route("/send", post(send_legacy))
        .route("/test", post(send_test))
}
