//! Orchestrator access through kubectl.
//!
//! This module provides `ServingClient`, a thin read/apply/delete wrapper over
//! `kubectl` for the serving resources the scenarios touch. kubectl keeps the
//! suite independent of any particular kubeconfig auth plugin.

use crate::conditions::ResourceSnapshot;
use crate::config::ConformanceConfig;
use crate::eventual::{poll_until, PollError, PollSettings};
use crate::matchers::StatePredicate;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Cluster access errors.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    #[error("kubectl {args} failed: {stderr}")]
    Kubectl { args: String, stderr: String },

    #[error("Failed to run kubectl: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Unparsable kubectl output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} {name} has no {field} yet")]
    MissingField {
        kind: &'static str,
        name: String,
        field: &'static str,
    },
}

impl ClusterError {
    /// Whether a retry might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClusterError::NotFound { .. } | ClusterError::MissingField { .. }
        )
    }
}

/// Serving resource kinds the suite reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Configuration,
    Revision,
}

impl ResourceKind {
    /// Fully-qualified kubectl resource name.
    pub fn resource(&self) -> &'static str {
        match self {
            ResourceKind::Configuration => "configurations.serving.knative.dev",
            ResourceKind::Revision => "revisions.serving.knative.dev",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKind::Configuration => "Configuration",
            ResourceKind::Revision => "Revision",
        }
    }
}

/// Client for serving resources in one namespace.
#[derive(Debug, Clone)]
pub struct ServingClient {
    kubectl: String,
    kube_context: Option<String>,
    namespace: String,
    poll: PollSettings,
}

impl ServingClient {
    pub fn new(config: &ConformanceConfig) -> Self {
        Self {
            kubectl: config.kubectl.clone(),
            kube_context: config.kube_context.clone(),
            namespace: config.namespace.clone(),
            poll: config.poll,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Arguments common to every invocation.
    pub fn base_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(context) = &self.kube_context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        args.push("--namespace".to_string());
        args.push(self.namespace.clone());
        args
    }

    pub fn kubectl(&self) -> &str {
        &self.kubectl
    }

    async fn run(&self, args: &[&str], stdin: Option<Vec<u8>>) -> Result<Vec<u8>, ClusterError> {
        let mut command = Command::new(&self.kubectl);
        command
            .args(self.base_args())
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);

        debug!(kubectl = %self.kubectl, args = ?args, "Running kubectl");

        let mut child = command.spawn()?;
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // A kubectl that exits early is reported through its exit status.
            if let Err(e) = pipe.write_all(&input).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
            // Close stdin so kubectl sees EOF.
            drop(pipe);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(ClusterError::Kubectl {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    /// Read one resource.
    pub async fn get(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<ResourceSnapshot, ClusterError> {
        let stdout = self
            .run(&["get", kind.resource(), name, "--output", "json"], None)
            .await
            .map_err(|e| match e {
                ClusterError::Kubectl { stderr, .. } if is_not_found(&stderr) => {
                    ClusterError::NotFound {
                        kind: kind.kind(),
                        name: name.to_string(),
                    }
                }
                other => other,
            })?;

        Ok(serde_json::from_slice(&stdout)?)
    }

    pub async fn get_configuration(&self, name: &str) -> Result<ResourceSnapshot, ClusterError> {
        self.get(ResourceKind::Configuration, name).await
    }

    pub async fn get_revision(&self, name: &str) -> Result<ResourceSnapshot, ClusterError> {
        self.get(ResourceKind::Revision, name).await
    }

    /// Create or update a Configuration from its JSON manifest.
    pub async fn create_configuration(
        &self,
        manifest: &serde_json::Value,
    ) -> Result<(), ClusterError> {
        let body = serde_json::to_vec(manifest)?;
        self.run(&["apply", "--filename", "-"], Some(body)).await?;
        Ok(())
    }

    /// Delete a Configuration (and, through owner references, its Revisions).
    pub async fn delete_configuration(&self, name: &str) -> Result<(), ClusterError> {
        let args = delete_configuration_args(name);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args, None).await?;
        Ok(())
    }

    /// Poll a Configuration until `predicate` settles.
    ///
    /// `description` names the wait in logs and timeout errors, e.g.
    /// `"ConfigContainersCrashing"`.
    pub async fn wait_for_configuration_state<P>(
        &self,
        name: &str,
        predicate: &P,
        description: &str,
    ) -> Result<ResourceSnapshot, PollError>
    where
        P: StatePredicate<ResourceSnapshot> + ?Sized,
    {
        poll_until(
            description,
            self.poll,
            || self.get_configuration(name),
            predicate,
        )
        .await
    }

    /// Poll a Revision until `predicate` settles.
    pub async fn wait_for_revision_state<P>(
        &self,
        name: &str,
        predicate: &P,
        description: &str,
    ) -> Result<ResourceSnapshot, PollError>
    where
        P: StatePredicate<ResourceSnapshot> + ?Sized,
    {
        poll_until(description, self.poll, || self.get_revision(name), predicate).await
    }

    /// Name of the newest Revision stamped out by a Configuration.
    pub async fn revision_from_configuration(&self, name: &str) -> Result<String, ClusterError> {
        let snapshot = self.get_configuration(name).await?;
        latest_created_revision(&snapshot)
    }

    /// Log URL published on a Revision's status.
    pub async fn log_url_from_revision(&self, name: &str) -> Result<String, ClusterError> {
        let snapshot = self.get_revision(name).await?;
        log_url(&snapshot)
    }

    /// Whether the test namespace exists and the API server answers.
    pub async fn check_namespace(&self) -> Result<(), ClusterError> {
        let namespace = self.namespace.clone();
        self.run(&["get", "namespace", &namespace, "--output", "name"], None)
            .await
            .map_err(|e| match e {
                ClusterError::Kubectl { stderr, .. } if is_not_found(&stderr) => {
                    ClusterError::NotFound {
                        kind: "Namespace",
                        name: namespace.clone(),
                    }
                }
                other => other,
            })?;
        Ok(())
    }

    /// Whether the serving CRDs are installed.
    pub async fn check_serving_api(&self) -> Result<(), ClusterError> {
        self.run(
            &[
                "get",
                "customresourcedefinition",
                ResourceKind::Configuration.resource(),
                "--output",
                "name",
            ],
            None,
        )
        .await?;
        Ok(())
    }
}

/// kubectl arguments that delete a Configuration without waiting, minus the
/// context and namespace flags from `ServingClient::base_args`.
pub(crate) fn delete_configuration_args(name: &str) -> Vec<String> {
    vec![
        "delete".to_string(),
        ResourceKind::Configuration.resource().to_string(),
        name.to_string(),
        "--ignore-not-found=true".to_string(),
        "--wait=false".to_string(),
    ]
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("NotFound") || stderr.contains("not found")
}

fn latest_created_revision(snapshot: &ResourceSnapshot) -> Result<String, ClusterError> {
    snapshot
        .status
        .latest_created_revision_name
        .clone()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ClusterError::MissingField {
            kind: "Configuration",
            name: snapshot.name().to_string(),
            field: "latestCreatedRevisionName",
        })
}

fn log_url(snapshot: &ResourceSnapshot) -> Result<String, ClusterError> {
    snapshot
        .status
        .log_url
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ClusterError::MissingField {
            kind: "Revision",
            name: snapshot.name().to_string(),
            field: "logUrl",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(context: Option<&str>) -> ServingClient {
        ServingClient::new(&ConformanceConfig {
            kube_context: context.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_base_args_without_context() {
        assert_eq!(
            client(None).base_args(),
            vec!["--namespace", "serving-tests"]
        );
    }

    #[test]
    fn test_base_args_with_context() {
        assert_eq!(
            client(Some("kind-serving")).base_args(),
            vec!["--context", "kind-serving", "--namespace", "serving-tests"]
        );
    }

    #[test]
    fn test_resource_kinds() {
        assert_eq!(
            ResourceKind::Configuration.resource(),
            "configurations.serving.knative.dev"
        );
        assert_eq!(ResourceKind::Revision.kind(), "Revision");
    }

    #[test]
    fn test_not_found_detection() {
        assert!(is_not_found(
            "Error from server (NotFound): configurations.serving.knative.dev \"x\" not found"
        ));
        assert!(!is_not_found("error: You must be logged in to the server"));
    }

    #[test]
    fn test_latest_created_revision() {
        let snapshot: ResourceSnapshot = serde_json::from_value(json!({
            "kind": "Configuration",
            "metadata": {"name": "cfg"},
            "status": {"latestCreatedRevisionName": "cfg-00001"}
        }))
        .unwrap();

        assert_eq!(latest_created_revision(&snapshot).unwrap(), "cfg-00001");
    }

    #[test]
    fn test_missing_revision_and_log_url() {
        let snapshot = ResourceSnapshot::new("Configuration", "cfg");

        let err = latest_created_revision(&snapshot).unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("latestCreatedRevisionName"));

        let err = log_url(&ResourceSnapshot::new("Revision", "cfg-00001")).unwrap_err();
        assert!(err.to_string().contains("logUrl"));
    }

    #[test]
    fn test_empty_log_url_is_missing() {
        let snapshot: ResourceSnapshot = serde_json::from_value(json!({
            "metadata": {"name": "rev"},
            "status": {"logUrl": ""}
        }))
        .unwrap();

        assert!(log_url(&snapshot).is_err());
    }

    #[test]
    fn test_delete_configuration_args() {
        assert_eq!(
            delete_configuration_args("crashy-abcdefgh"),
            vec![
                "delete",
                "configurations.serving.knative.dev",
                "crashy-abcdefgh",
                "--ignore-not-found=true",
                "--wait=false",
            ]
        );
    }

    fn client_with_binary(kubectl: &str) -> ServingClient {
        ServingClient::new(&ConformanceConfig {
            kubectl: kubectl.to_string(),
            ..Default::default()
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_delete_configuration_runs_delete() {
        // `true` stands in for a kubectl that succeeds.
        client_with_binary("true")
            .delete_configuration("crashy-abcdefgh")
            .await
            .expect("delete should succeed when kubectl exits 0");

        let err = client_with_binary("false")
            .delete_configuration("crashy-abcdefgh")
            .await
            .expect_err("non-zero exit is a kubectl error");
        match err {
            ClusterError::Kubectl { args, .. } => assert_eq!(
                args,
                "delete configurations.serving.knative.dev crashy-abcdefgh \
                 --ignore-not-found=true --wait=false"
            ),
            other => panic!("expected kubectl error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_create_configuration_applies_from_stdin() {
        let manifest = json!({"kind": "Configuration", "metadata": {"name": "cfg"}});

        client_with_binary("true")
            .create_configuration(&manifest)
            .await
            .expect("apply should succeed when kubectl exits 0");

        let err = client_with_binary("false")
            .create_configuration(&manifest)
            .await
            .expect_err("non-zero exit is a kubectl error");
        assert!(matches!(
            err,
            ClusterError::Kubectl { ref args, .. } if args == "apply --filename -"
        ));
    }

    #[tokio::test]
    async fn test_missing_kubectl_binary_is_spawn_error() {
        let client = ServingClient::new(&ConformanceConfig {
            kubectl: "kubectl-that-does-not-exist-7c1e".to_string(),
            ..Default::default()
        });

        let result = client.get_configuration("anything").await;
        assert!(matches!(result, Err(ClusterError::Spawn(_))));
    }
}
