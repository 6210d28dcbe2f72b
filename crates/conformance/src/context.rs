//! Per-scenario test context.
//!
//! Each scenario builds its own `TestContext` instead of sharing a client or
//! namespace through globals, so parallel scenarios share nothing mutable.

use crate::cluster::{delete_configuration_args, ClusterError, ServingClient};
use crate::config::{ConfigError, ConformanceConfig};
use crate::fixtures::configuration::{configuration_manifest, ConfigurationOptions};
use crate::fixtures::ResourceNames;
use std::process::{Command, Output};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{info, warn};

/// Configuration and client for one scenario.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub config: ConformanceConfig,
    pub client: ServingClient,
}

impl TestContext {
    /// Load configuration from the environment and install test logging.
    pub fn setup() -> Result<Self, ConfigError> {
        crate::init_test_tracing();
        Ok(Self::from_config(ConformanceConfig::from_env()?))
    }

    pub fn from_config(config: ConformanceConfig) -> Self {
        let client = ServingClient::new(&config);
        Self { config, client }
    }

    /// Create the Configuration for `names`.
    ///
    /// The returned guard deletes it again when dropped. Keep it alive for the
    /// rest of the scenario.
    pub async fn create_configuration(
        &self,
        names: &ResourceNames,
        options: &ConfigurationOptions,
    ) -> Result<TeardownGuard, ClusterError> {
        let image = self.config.image_path(&names.image);
        let manifest =
            configuration_manifest(names, &self.config.namespace, &image, options);

        info!(config = %names.config, image = %image, "Creating Configuration");
        self.client.create_configuration(&manifest).await?;

        Ok(TeardownGuard {
            client: self.client.clone(),
            name: names.config.clone(),
        })
    }
}

/// Deletes a scenario's Configuration on drop, best effort.
///
/// Deletion runs even when the scenario panics on a failed assertion. `drop`
/// waits for kubectl synchronously. On a multi-thread runtime the wait is
/// moved off the worker with `block_in_place`; on a current-thread runtime
/// (the `#[tokio::test]` default) it blocks the runtime until kubectl exits.
#[derive(Debug)]
#[must_use = "dropping the guard deletes the Configuration immediately"]
pub struct TeardownGuard {
    client: ServingClient,
    name: String,
}

impl TeardownGuard {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn delete_command(&self) -> Command {
        let mut command = Command::new(self.client.kubectl());
        command
            .args(self.client.base_args())
            .args(delete_configuration_args(&self.name));
        command
    }

    fn delete(&self) -> std::io::Result<Output> {
        let mut command = self.delete_command();
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| command.output())
            }
            _ => command.output(),
        }
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        match self.delete() {
            Ok(output) if output.status.success() => {
                info!(config = %self.name, "Deleted Configuration");
            }
            Ok(output) => warn!(
                config = %self.name,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Failed to delete Configuration"
            ),
            Err(e) => warn!(config = %self.name, error = %e, "Failed to run kubectl delete"),
        }
    }
}
