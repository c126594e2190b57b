//! HTTP server configuration

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

use super::error::ValidationError;

/// Longest request timeout accepted; anything above this is a typo.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Settings for the CRM-facing HTTP listener
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface the listener binds to
    pub host: String,

    /// TCP port for the REST API
    pub port: u16,

    /// Deployment environment; production switches log output to JSON
    pub environment: Environment,

    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,

    /// Per-request timeout applied by the HTTP layer, in seconds
    pub request_timeout_secs: u64,

    /// Comma-separated allowed CORS origins; unset means permissive
    pub cors_origins: Option<String>,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::Development,
            log_level: "info,whatsapp_gateway=debug".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to.
    ///
    /// The host is checked by [`ServerConfig::validate`] at startup, so the
    /// parse here cannot fail afterwards.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip: IpAddr = self.host.parse().expect("host validated at startup");
        SocketAddr::new(ip, self.port)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Allowed CORS origins, split and trimmed; empty entries are dropped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        let Some(raw) = &self.cors_origins else {
            return Vec::new();
        };
        raw.split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ValidationError::InvalidHost);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}
