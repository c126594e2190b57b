//! HTTP handlers for the send endpoints.
//!
//! The two send endpoints differ in how failures map to HTTP: the CRM's
//! current integration (`/send-message`) expects a 200 carrying
//! `success: false`, while the legacy `/send` returns 400 on any failure.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::GatewayState;
use crate::application::MessageDispatcher;

use super::dto::{LegacySendRequest, SendMessageRequest, SendResponse, TestSendRequest};

/// POST /send-message - send a text, CRM-compatible response mapping.
pub async fn send_message(
    State(state): State<GatewayState>,
    Json(request): Json<SendMessageRequest>,
) -> Response {
    let (Some(phone), Some(message)) = (request.phone, request.message) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(SendResponse::rejected("Phone number and message are required")),
        )
            .into_response();
    };

    let body = match state.dispatcher.send_text(&phone, &message).await {
        Ok(()) => SendResponse::sent(),
        Err(e) => SendResponse::failed(e.to_string()),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// POST /send - legacy alias; failures are 400s.
pub async fn send_legacy(
    State(state): State<GatewayState>,
    Json(request): Json<LegacySendRequest>,
) -> Response {
    let (Some(phone), Some(message)) = (request.phone_number, request.message) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(SendResponse::failed("Phone number and message are required")),
        )
            .into_response();
    };

    match state.dispatcher.send_text(&phone, &message).await {
        Ok(()) => (StatusCode::OK, Json(SendResponse::sent())).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(SendResponse::failed(e.to_string())),
        )
            .into_response(),
    }
}

/// POST /test - send the canned diagnostic message.
pub async fn send_test(
    State(state): State<GatewayState>,
    Json(request): Json<TestSendRequest>,
) -> Response {
    let Some(phone) = request.phone_number else {
        return (
            StatusCode::BAD_REQUEST,
            Json(SendResponse::failed("Phone number is required")),
        )
            .into_response();
    };

    let body = match state
        .dispatcher
        .send_text(&phone, &MessageDispatcher::diagnostic_message())
        .await
    {
        Ok(()) => SendResponse::sent(),
        Err(e) => SendResponse::failed(e.to_string()),
    };
    (StatusCode::OK, Json(body)).into_response()
}
