//! Conformance run configuration.
//!
//! Everything a scenario needs to reach the cluster, loaded from the
//! environment once per scenario instead of living in globals.

use crate::eventual::PollSettings;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("{0} must be greater than zero")]
    Zero(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceConfig {
    /// Namespace every scenario creates its resources in.
    pub namespace: String,
    /// kubectl binary to invoke.
    pub kubectl: String,
    /// Optional kubeconfig context.
    pub kube_context: Option<String>,
    /// Registry prefix for test images.
    pub image_repo: String,
    /// Tag for test images.
    pub image_tag: String,
    /// Timing for state waits.
    pub poll: PollSettings,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        Self {
            namespace: "serving-tests".to_string(),
            kubectl: "kubectl".to_string(),
            kube_context: None,
            image_repo: "ko.local".to_string(),
            image_tag: "latest".to_string(),
            poll: PollSettings::default(),
        }
    }
}

impl ConformanceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let string = |name: &str, default: String| {
            vars.get(name)
                .filter(|v| !v.is_empty())
                .cloned()
                .unwrap_or(default)
        };

        let timeout = match positive(vars, "SERVING_POLL_TIMEOUT_SECONDS")? {
            Some(secs) => Duration::from_secs(secs),
            None => defaults.poll.timeout,
        };
        let interval = match positive(vars, "SERVING_POLL_INTERVAL_MILLIS")? {
            Some(millis) => Duration::from_millis(millis),
            None => defaults.poll.interval,
        };

        Ok(Self {
            namespace: string("SERVING_TEST_NAMESPACE", defaults.namespace),
            kubectl: string("KUBECTL", defaults.kubectl),
            kube_context: vars.get("KUBE_CONTEXT").filter(|v| !v.is_empty()).cloned(),
            image_repo: string("SERVING_IMAGE_REPO", defaults.image_repo),
            image_tag: string("SERVING_IMAGE_TAG", defaults.image_tag),
            poll: PollSettings::new(timeout, interval),
        })
    }

    /// Full image reference for a test image, e.g. `ko.local/failing:latest`.
    pub fn image_path(&self, image: &str) -> String {
        format!(
            "{}/{}:{}",
            self.image_repo.trim_end_matches('/'),
            image,
            self.image_tag
        )
    }
}

fn positive(vars: &HashMap<String, String>, name: &str) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = vars.get(name) else {
        return Ok(None);
    };
    let value = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw.clone(),
    })?;
    if value == 0 {
        return Err(ConfigError::Zero(name.to_string()));
    }
    Ok(Some(value))
}
