//! Messaging configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::ports::SessionOptions;

use super::error::ValidationError;

/// Wire session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Directory holding the persisted session credentials
    #[serde(default = "default_auth_dir")]
    pub auth_dir: PathBuf,

    /// Device label shown in the account's linked-devices list
    #[serde(default = "default_device_label")]
    pub device_label: String,

    /// Whether the session advertises online presence on connect
    #[serde(default)]
    pub mark_online: bool,
}

impl MessagingConfig {
    /// Session options handed to the wire client on connect
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            device_label: self.device_label.clone(),
            mark_online: self.mark_online,
        }
    }

    /// Validate messaging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.auth_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptyAuthDir);
        }
        if self.device_label.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceLabel);
        }
        Ok(())
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            auth_dir: default_auth_dir(),
            device_label: default_device_label(),
            mark_online: false,
        }
    }
}

fn default_auth_dir() -> PathBuf {
    PathBuf::from("auth_info")
}

fn default_device_label() -> String {
    "CRM Gateway".to_string()
}
