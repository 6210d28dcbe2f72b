use common::config::{ConfigError, ServerConfig};
use std::collections::HashMap;
use std::env;

/// Greeting target when `TARGET` is unset or empty.
pub const DEFAULT_TARGET: &str = "World";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub target: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let server = ServerConfig::from_vars(vars)?;

        let target = vars
            .get("TARGET")
            .filter(|t| !t.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());

        Ok(Config { server, target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars_default_target() {
        let config = Config::from_vars(&HashMap::new()).expect("Config should load");
        assert_eq!(config.target, "World");
    }

    #[test]
    fn test_from_vars_empty_target_uses_default() {
        let vars = HashMap::from([("TARGET".to_string(), String::new())]);
        let config = Config::from_vars(&vars).expect("Config should load");
        assert_eq!(config.target, "World");
    }

    #[test]
    fn test_from_vars_custom_target() {
        let vars = HashMap::from([
            ("TARGET".to_string(), "Knative".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:9090".to_string()),
        ]);
        let config = Config::from_vars(&vars).expect("Config should load");
        assert_eq!(config.target, "Knative");
        assert_eq!(config.server.bind_address, "127.0.0.1:9090");
    }

    #[test]
    fn test_from_vars_invalid_port() {
        let vars = HashMap::from([("PORT".to_string(), "99999".to_string())]);
        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }
}
