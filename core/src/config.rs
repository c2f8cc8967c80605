//! Adapter configuration.
//!
//! Loaded once, either deserialized from a host config file or read from the
//! environment with `AdapterConfig::from_env`, and validated up front so a
//! bad path fails at startup rather than on the first request.

use std::env;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_URL_PATH: &str = "/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration error for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Where the database client endpoint lives.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Scheme and authority of the service, used by `UreqTransport`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the database clients endpoint, relative to the service root.
    #[serde(default = "default_url_path")]
    pub url_path: String,
    /// Global request timeout applied by the transport, if any.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Largest response body the transport will read. Unlimited when unset.
    #[serde(default)]
    pub max_body_bytes: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_url_path() -> String {
    DEFAULT_URL_PATH.to_string()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            url_path: default_url_path(),
            timeout_secs: None,
            max_body_bytes: None,
        }
    }
}

impl AdapterConfig {
    /// Build a config for `url_path` with the remaining fields defaulted.
    pub fn with_url_path(url_path: impl Into<String>) -> Self {
        Self {
            url_path: url_path.into(),
            ..Self::default()
        }
    }

    /// Load from `DBCLIENT_BASE_URL`, `DBCLIENT_URL_PATH`,
    /// `DBCLIENT_TIMEOUT_SECS` and `DBCLIENT_MAX_BODY_BYTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("DBCLIENT_BASE_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_base_url);

        let url_path = lookup("DBCLIENT_URL_PATH")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_url_path);

        let timeout_secs = match lookup("DBCLIENT_TIMEOUT_SECS").filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                field: "DBCLIENT_TIMEOUT_SECS",
                message: format!("'{raw}' is not a number of seconds: {e}"),
            })?),
            None => None,
        };

        let max_body_bytes = match lookup("DBCLIENT_MAX_BODY_BYTES").filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                field: "DBCLIENT_MAX_BODY_BYTES",
                message: format!("'{raw}' is not a byte count: {e}"),
            })?),
            None => None,
        };

        let config = Self {
            base_url,
            url_path,
            timeout_secs,
            max_body_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.url_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "url_path",
                message: format!("'{}' must start with '/'", self.url_path),
            });
        }
        Ok(())
    }
}
