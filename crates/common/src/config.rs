//! Environment-driven configuration shared by the fixture servers.

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Port the platform routes traffic to when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Listener configuration for a fixture server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`
    pub bind_address: String,
    /// How long to keep draining after a shutdown signal
    pub drain_period: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PORT` or `DRAIN_SECONDS` is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing)
    ///
    /// `BIND_ADDRESS` wins over `PORT` when both are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PORT` or `DRAIN_SECONDS` is not a number.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = match vars.get("BIND_ADDRESS") {
            Some(address) => address.clone(),
            None => {
                let port = match vars.get("PORT") {
                    Some(raw) => raw
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let drain_seconds = parse_u64(vars, "DRAIN_SECONDS")?.unwrap_or(0);

        Ok(Self {
            bind_address,
            drain_period: Duration::from_secs(drain_seconds),
        })
    }
}

/// Parse an optional unsigned integer variable.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the variable is set but not a `u64`.
pub fn parse_u64(vars: &HashMap<String, String>, name: &str) -> Result<Option<u64>, ConfigError> {
    vars.get(name)
        .map(|raw| {
            raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}
