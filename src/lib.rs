//! WhatsApp Gateway - HTTP facade over an external messaging protocol client.
//!
//! Lets a CRM trigger outbound text messages and poll connection/pairing
//! status. The protocol client itself stays behind the `WireClient` port;
//! this crate owns the connection lifecycle, phone-number normalization and
//! the REST surface.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
