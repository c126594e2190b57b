//! HTTP handlers for liveness and connection status.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};

use crate::adapters::http::GatewayState;

use super::dto::{HealthResponse, QrResponse, StatusResponse};

const SERVICE_NAME: &str = "whatsapp-gateway";

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET /health - liveness probe.
pub async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: now_iso(),
        connection_state: state.lifecycle.current().state,
    })
}

/// GET /status - connection state plus the authenticated account.
pub async fn status(State(state): State<GatewayState>) -> Json<StatusResponse> {
    let snapshot = state.lifecycle.current();
    Json(StatusResponse {
        connected: snapshot.is_ready(),
        connection_state: snapshot.state,
        user: snapshot.identity.map(Into::into),
        timestamp: now_iso(),
    })
}

/// GET /qr - current pairing token, when one is waiting to be scanned.
pub async fn qr(State(state): State<GatewayState>) -> Json<QrResponse> {
    let snapshot = state.lifecycle.current();
    Json(QrResponse {
        qr: snapshot.code,
        connection_state: snapshot.state,
    })
}
