//! HTTP DTOs for the send endpoints.
//!
//! Request fields are `Option`s so a missing field produces the gateway's own
//! 400 body instead of a framework rejection; the CRM depends on the
//! `{success: false, ...}` shape.

use serde::{Deserialize, Serialize};

/// Request body for `POST /send-message`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// Request body for the legacy `POST /send`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacySendRequest {
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

/// Request body for `POST /test`.
#[derive(Debug, Clone, Deserialize)]
pub struct TestSendRequest {
    pub phone_number: Option<String>,
}

/// Uniform send outcome.
///
/// Successful sends carry `message`, failures carry `error` - except on
/// `/send-message`, whose missing-field rejection historically used the
/// `message` key. Both spellings are kept.
#[derive(Debug, Clone, Serialize)]
pub struct SendResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: Some("Message sent successfully".to_string()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Failure reported under the `message` key (`/send-message` rejections).
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            error: None,
        }
    }
}
