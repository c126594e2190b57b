//! Integration tests for the gateway HTTP API.
//!
//! Drives the full axum router against the loopback wire client: request
//! DTOs, status-code mapping per endpoint, and the send path down to the
//! recorded wire messages.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use async_trait::async_trait;

use whatsapp_gateway::adapters::http::{gateway_router, GatewayState};
use whatsapp_gateway::adapters::wire::LoopbackWireClient;
use whatsapp_gateway::application::{LifecycleManager, MessageDispatcher};
use whatsapp_gateway::domain::connection::{
    CloseReason, ConnectionEvent, CredentialBlob, LinkedIdentity,
};
use whatsapp_gateway::ports::{
    CredentialStore, CredentialStoreError, SessionOptions, WireClient,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Credential store that keeps the blob in memory.
#[derive(Default)]
struct InMemoryCredentialStore {
    stored: Mutex<Option<CredentialBlob>>,
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<CredentialBlob>, CredentialStoreError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, credentials: &CredentialBlob) -> Result<(), CredentialStoreError> {
        *self.stored.lock().unwrap() = Some(credentials.clone());
        Ok(())
    }
}

struct Gateway {
    app: Router,
    wire: Arc<LoopbackWireClient>,
    lifecycle: Arc<LifecycleManager>,
}

fn gateway_with(wire: LoopbackWireClient) -> Gateway {
    let wire = Arc::new(wire);
    let lifecycle = LifecycleManager::new(
        wire.clone() as Arc<dyn WireClient>,
        Arc::new(InMemoryCredentialStore::default()),
        SessionOptions::default(),
    );
    let dispatcher = Arc::new(MessageDispatcher::new(
        wire.clone() as Arc<dyn WireClient>,
        lifecycle.clone(),
    ));
    Gateway {
        app: gateway_router(GatewayState::new(lifecycle.clone(), dispatcher)),
        wire,
        lifecycle,
    }
}

/// Gateway whose session auto-opens on connect.
async fn connected_gateway() -> Gateway {
    let gateway = gateway_with(LoopbackWireClient::new());
    gateway.lifecycle.connect().await;
    wait_until_ready(&gateway.lifecycle).await;
    gateway
}

/// Gateway with a session that emits nothing until told to.
async fn manual_gateway() -> Gateway {
    let gateway = gateway_with(LoopbackWireClient::manual());
    gateway.lifecycle.connect().await;
    gateway
}

async fn wait_until_ready(lifecycle: &LifecycleManager) {
    for _ in 0..100 {
        if lifecycle.is_ready() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("lifecycle never reached connected");
}

/// Let the event pump drain.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Status endpoints
// =============================================================================

#[tokio::test]
async fn health_reports_ok_with_the_connection_state() {
    let gateway = connected_gateway().await;
    let (status, body) = get(gateway.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connectionState"], "connected");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn status_reflects_a_connected_session() {
    let gateway = connected_gateway().await;
    let (status, body) = get(gateway.app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
    assert_eq!(body["connectionState"], "connected");
    assert!(body["user"]["id"].as_str().unwrap().starts_with("loopback:"));
}

#[tokio::test]
async fn status_before_any_session_shows_disconnected() {
    let gateway = gateway_with(LoopbackWireClient::manual());
    let (status, body) = get(gateway.app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], false);
    assert_eq!(body["connectionState"], "disconnected");
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn qr_surfaces_the_pairing_token_while_waiting_for_a_scan() {
    let gateway = manual_gateway().await;
    gateway.wire.emit(ConnectionEvent::PairingCodeIssued {
        code: "2@pairing-token".to_string(),
    });
    settle().await;

    let (status, body) = get(gateway.app, "/qr").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["qr"], "2@pairing-token");
    assert_eq!(body["connectionState"], "qr_required");
}

#[tokio::test]
async fn qr_is_null_once_the_session_opens() {
    let gateway = connected_gateway().await;
    let (status, body) = get(gateway.app, "/qr").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["qr"].is_null());
    assert_eq!(body["connectionState"], "connected");
}

// =============================================================================
// Send endpoints
// =============================================================================

#[tokio::test]
async fn send_message_with_missing_message_field_is_rejected_with_400() {
    let gateway = connected_gateway().await;
    let (status, body) = post(
        gateway.app,
        "/send-message",
        json!({"phone": "05321234567"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
    assert!(gateway.wire.sent().is_empty());
}

#[tokio::test]
async fn send_message_delivers_through_the_wire_when_connected() {
    let gateway = connected_gateway().await;
    let (status, body) = post(
        gateway.app,
        "/send-message",
        json!({"phone": "05321234567", "message": "order shipped"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let sent = gateway.wire.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.as_str(), "905321234567@s.whatsapp.net");
    assert_eq!(sent[0].body, "order shipped");
}

#[tokio::test]
async fn send_message_while_disconnected_rides_a_200_with_success_false() {
    let gateway = manual_gateway().await;
    let (status, body) = post(
        gateway.app,
        "/send-message",
        json!({"phone": "05321234567", "message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "not connected");
    assert!(gateway.wire.sent().is_empty());
}

#[tokio::test]
async fn legacy_send_maps_failures_to_400() {
    let gateway = manual_gateway().await;
    let (status, body) = post(
        gateway.app,
        "/send",
        json!({"phone_number": "05321234567", "message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "not connected");
}

#[tokio::test]
async fn legacy_send_with_missing_fields_is_400() {
    let gateway = connected_gateway().await;
    let (status, body) = post(gateway.app, "/send", json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn legacy_send_succeeds_with_200() {
    let gateway = connected_gateway().await;
    let (status, body) = post(
        gateway.app,
        "/send",
        json!({"phone_number": "5321234567", "message": "hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        gateway.wire.sent()[0].to.as_str(),
        "905321234567@s.whatsapp.net"
    );
}

#[tokio::test]
async fn test_endpoint_sends_the_diagnostic_message() {
    let gateway = connected_gateway().await;
    let (status, body) = post(
        gateway.app,
        "/test",
        json!({"phone_number": "905321234567"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let sent = gateway.wire.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.as_str(), "905321234567@s.whatsapp.net");
    assert!(sent[0].body.starts_with("Test message"));
}

#[tokio::test]
async fn test_endpoint_requires_a_phone_number() {
    let gateway = connected_gateway().await;
    let (status, body) = post(gateway.app, "/test", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

// =============================================================================
// Logout over HTTP
// =============================================================================

#[tokio::test]
async fn logout_is_visible_on_every_status_endpoint() {
    let gateway = connected_gateway().await;
    gateway.wire.emit(ConnectionEvent::Closed {
        reason: CloseReason::LoggedOut,
    });
    settle().await;

    let (_, body) = get(gateway.app.clone(), "/status").await;
    assert_eq!(body["connected"], false);
    assert_eq!(body["connectionState"], "logged_out");
    assert!(body["user"].is_null());

    let (_, body) = get(gateway.app, "/qr").await;
    assert!(body["qr"].is_null());
    assert_eq!(body["connectionState"], "logged_out");
}

#[tokio::test]
async fn reopened_session_recovers_the_identity() {
    let gateway = manual_gateway().await;
    gateway.wire.emit(ConnectionEvent::Opened {
        identity: LinkedIdentity {
            id: "905001112233".to_string(),
            name: Some("Support".to_string()),
        },
    });
    settle().await;

    let (_, body) = get(gateway.app, "/status").await;
    assert_eq!(body["connected"], true);
    assert_eq!(body["user"]["id"], "905001112233");
    assert_eq!(body["user"]["name"], "Support");
}
