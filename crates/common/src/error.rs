//! Common error types for the fixture servers.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can stop a fixture server from starting or serving.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bind address did not parse
    #[error("Invalid bind address {address}: {source}")]
    InvalidAddress {
        address: String,
        source: std::net::AddrParseError,
    },

    /// Listener could not be bound
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// Server loop failed
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Result type alias using `FixtureError`
pub type Result<T> = std::result::Result<T, FixtureError>;
