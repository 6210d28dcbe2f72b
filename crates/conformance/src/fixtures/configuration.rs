//! Configuration manifests.
//!
//! Builds `serving.knative.dev/v1alpha1` Configuration objects with optional
//! readiness and liveness probes on the single user container.

use serde::Serialize;
use serde_json::{json, Value};

pub const SERVING_API_VERSION: &str = "serving.knative.dev/v1alpha1";

/// Names of the resources a scenario works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    /// Configuration object name.
    pub config: String,
    /// Test image name, without repository or tag.
    pub image: String,
}

impl ResourceNames {
    pub fn new(config: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            image: image.into(),
        }
    }
}

/// HTTP GET probe action. Empty fields let the platform fill in the user
/// port and `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpGetAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Container probe. Unset timing fields fall back to the kubelet defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    pub http_get: HttpGetAction,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_delay_seconds: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_seconds: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_threshold: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<i32>,
}

impl Probe {
    /// HTTP GET probe with every field left to defaults.
    pub fn http_get() -> Self {
        Self::default()
    }

    /// HTTP GET probe against `path`.
    pub fn http_get_path(path: impl Into<String>) -> Self {
        Self {
            http_get: HttpGetAction {
                path: Some(path.into()),
                port: None,
            },
            ..Default::default()
        }
    }

    /// Set all timing fields at once.
    pub fn with_timing(
        mut self,
        initial_delay_seconds: i32,
        timeout_seconds: i32,
        period_seconds: i32,
        success_threshold: i32,
        failure_threshold: i32,
    ) -> Self {
        self.initial_delay_seconds = Some(initial_delay_seconds);
        self.timeout_seconds = Some(timeout_seconds);
        self.period_seconds = Some(period_seconds);
        self.success_threshold = Some(success_threshold);
        self.failure_threshold = Some(failure_threshold);
        self
    }
}

/// Knobs on the created Configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationOptions {
    pub readiness_probe: Option<Probe>,
    pub liveness_probe: Option<Probe>,
    /// Extra container environment, e.g. `TARGET` for the greeting image.
    pub env: Vec<(String, String)>,
}

/// Render the Configuration manifest for `names`.
pub fn configuration_manifest(
    names: &ResourceNames,
    namespace: &str,
    image_path: &str,
    options: &ConfigurationOptions,
) -> Value {
    let mut container = json!({ "image": image_path });

    if let Some(probe) = &options.readiness_probe {
        container["readinessProbe"] = json!(probe);
    }
    if let Some(probe) = &options.liveness_probe {
        container["livenessProbe"] = json!(probe);
    }
    if !options.env.is_empty() {
        container["env"] = options
            .env
            .iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect();
    }

    json!({
        "apiVersion": SERVING_API_VERSION,
        "kind": "Configuration",
        "metadata": {
            "name": names.config,
            "namespace": namespace,
        },
        "spec": {
            "revisionTemplate": {
                "metadata": {
                    "labels": { "serving.knative.dev/test-image": names.image },
                },
                "spec": { "container": container },
            },
        },
    })
}
