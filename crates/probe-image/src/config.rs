use common::config::{parse_u64, ConfigError, ServerConfig};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// How long `/healthz` keeps answering 200 after process start.
pub const DEFAULT_HEALTHZ_WINDOW: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub healthz_window: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let server = ServerConfig::from_vars(vars)?;

        let healthz_window = parse_u64(vars, "HEALTHZ_WINDOW_SECONDS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HEALTHZ_WINDOW);

        Ok(Config {
            server,
            healthz_window,
        })
    }
}
