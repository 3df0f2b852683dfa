//! Transport configuration.
//!
//! Timeouts and limits are handed to the transport unchanged; the connector
//! itself never enforces them.

use std::time::Duration;

use crate::error::ConfigError;

pub const TIMEOUT_VAR: &str = "REST_CONNECTOR_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "REST_CONNECTOR_CONNECT_TIMEOUT_SECS";
pub const MAX_BODY_BYTES_VAR: &str = "REST_CONNECTOR_MAX_BODY_BYTES";

/// Default cap on response bodies read into memory (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-call timeout, `None` for no limit.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub max_body_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the `REST_CONNECTOR_*` environment variables.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(secs) = parse_var(&lookup, TIMEOUT_VAR)? {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_var(&lookup, CONNECT_TIMEOUT_VAR)? {
            config.connect_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(bytes) = parse_var(&lookup, MAX_BODY_BYTES_VAR)? {
            config.max_body_bytes = bytes;
        }
        Ok(config)
    }
}

fn parse_var<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
