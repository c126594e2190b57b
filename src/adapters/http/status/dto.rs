//! HTTP DTOs for health, status and pairing endpoints.
//!
//! Field names (including the camelCase `connectionState`) are part of the
//! CRM-facing contract and must not drift with internal renames.

use serde::Serialize;

use crate::domain::connection::{ConnectionState, LinkedIdentity};

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
    #[serde(rename = "connectionState")]
    pub connection_state: ConnectionState,
}

/// Response for `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub connected: bool,
    #[serde(rename = "connectionState")]
    pub connection_state: ConnectionState,
    pub user: Option<UserResponse>,
    pub timestamp: String,
}

/// The authenticated account, as shown to the CRM.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: Option<String>,
}

impl From<LinkedIdentity> for UserResponse {
    fn from(identity: LinkedIdentity) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
        }
    }
}

/// Response for `GET /qr`.
#[derive(Debug, Clone, Serialize)]
pub struct QrResponse {
    pub qr: Option<String>,
    #[serde(rename = "connectionState")]
    pub connection_state: ConnectionState,
}
