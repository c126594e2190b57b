//! HTTP adapter for the send endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{LegacySendRequest, SendMessageRequest, SendResponse, TestSendRequest};
pub use routes::messaging_routes;
