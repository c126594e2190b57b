//! HTTP adapter for health, status and pairing endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{HealthResponse, QrResponse, StatusResponse, UserResponse};
pub use routes::status_routes;
