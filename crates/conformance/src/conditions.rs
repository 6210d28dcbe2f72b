//! Status conditions and resource snapshots.
//!
//! A `ResourceSnapshot` is one read of a serving resource as returned by the
//! orchestrator API. Snapshots are deserialized straight from `kubectl -o json`
//! output and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of status condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
    /// Top-level readiness of a Configuration or Revision.
    Ready,
    /// Revision containers pass their probes and are not crash looping.
    ContainerHealthy,
    /// Revision deployment has the resources it asked for.
    ResourcesAvailable,
    /// Revision is receiving traffic (or can scale up to).
    Active,
    /// Any condition type this crate does not model.
    Other(String),
}

impl From<String> for ConditionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Ready" => ConditionType::Ready,
            "ContainerHealthy" => ConditionType::ContainerHealthy,
            "ResourcesAvailable" => ConditionType::ResourcesAvailable,
            "Active" => ConditionType::Active,
            _ => ConditionType::Other(value),
        }
    }
}

impl From<ConditionType> for String {
    fn from(value: ConditionType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionType::Ready => f.write_str("Ready"),
            ConditionType::ContainerHealthy => f.write_str("ContainerHealthy"),
            ConditionType::ResourcesAvailable => f.write_str("ResourcesAvailable"),
            ConditionType::Active => f.write_str("Active"),
            ConditionType::Other(other) => f.write_str(other),
        }
    }
}

/// Tri-state condition status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionStatus::True => f.write_str("True"),
            ConditionStatus::False => f.write_str("False"),
            ConditionStatus::Unknown => f.write_str("Unknown"),
        }
    }
}

/// A single status condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,

    pub status: ConditionStatus,

    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub message: String,
}

impl Condition {
    pub fn new(condition_type: ConditionType, status: ConditionStatus) -> Self {
        Self {
            condition_type,
            status,
            reason: String::new(),
            message: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    pub fn is_false(&self) -> bool {
        self.status == ConditionStatus::False
    }

    pub fn is_unknown(&self) -> bool {
        self.status == ConditionStatus::Unknown
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reason={:?}, Message={:?}, Status=\"{}\"",
            self.reason, self.message, self.status
        )
    }
}

/// Object metadata fields used by the tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
}

/// Status block shared by Configurations and Revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    #[serde(default)]
    pub observed_generation: Option<i64>,

    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Configuration only.
    #[serde(default)]
    pub latest_created_revision_name: Option<String>,

    /// Configuration only.
    #[serde(default)]
    pub latest_ready_revision_name: Option<String>,

    /// Revision only.
    #[serde(default)]
    pub log_url: Option<String>,
}

/// Point-in-time read of a serving resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    #[serde(default)]
    pub kind: String,

    pub metadata: ObjectMeta,

    #[serde(default)]
    pub status: ResourceStatus,
}

impl ResourceSnapshot {
    /// Snapshot with no status, as seen right after creation.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            metadata: ObjectMeta {
                name: name.into(),
                ..Default::default()
            },
            status: ResourceStatus::default(),
        }
    }

    /// Add a condition, replacing any existing one of the same type.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.status
            .conditions
            .retain(|c| c.condition_type != condition.condition_type);
        self.status.conditions.push(condition);
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Look up the condition of the given type, if reported yet.
    pub fn condition(&self, condition_type: &ConditionType) -> Option<&Condition> {
        self.status
            .conditions
            .iter()
            .find(|c| &c.condition_type == condition_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_configuration_status() {
        let raw = json!({
            "apiVersion": "serving.knative.dev/v1alpha1",
            "kind": "Configuration",
            "metadata": {"name": "crashy-abc", "namespace": "serving-tests", "generation": 1},
            "status": {
                "observedGeneration": 1,
                "latestCreatedRevisionName": "crashy-abc-00001",
                "conditions": [{
                    "type": "Ready",
                    "status": "False",
                    "reason": "RevisionFailed",
                    "message": "Container failed with: Crashed...",
                    "lastTransitionTime": "2019-01-01T00:00:00Z"
                }]
            }
        });

        let snapshot: ResourceSnapshot = serde_json::from_value(raw).unwrap();

        assert_eq!(snapshot.kind, "Configuration");
        assert_eq!(snapshot.name(), "crashy-abc");
        assert_eq!(
            snapshot.status.latest_created_revision_name.as_deref(),
            Some("crashy-abc-00001")
        );

        let ready = snapshot.condition(&ConditionType::Ready).unwrap();
        assert!(ready.is_false());
        assert_eq!(ready.reason, "RevisionFailed");
        assert!(ready.message.contains("Crashed..."));
    }

    #[test]
    fn test_deserialize_without_status() {
        let raw = json!({"kind": "Revision", "metadata": {"name": "rev-1"}});

        let snapshot: ResourceSnapshot = serde_json::from_value(raw).unwrap();

        assert!(snapshot.status.conditions.is_empty());
        assert!(snapshot.condition(&ConditionType::Ready).is_none());
    }

    #[test]
    fn test_unrecognized_values_are_preserved_or_unknown() {
        let raw = json!({
            "metadata": {"name": "rev-1"},
            "status": {"conditions": [
                {"type": "BuildSucceeded", "status": "Maybe"}
            ]}
        });

        let snapshot: ResourceSnapshot = serde_json::from_value(raw).unwrap();
        let condition = &snapshot.status.conditions[0];

        assert_eq!(
            condition.condition_type,
            ConditionType::Other("BuildSucceeded".to_string())
        );
        assert!(condition.is_unknown());
        assert!(condition.reason.is_empty());
    }

    #[test]
    fn test_with_condition_keeps_one_per_type() {
        let snapshot = ResourceSnapshot::new("Revision", "rev-1")
            .with_condition(Condition::new(ConditionType::Ready, ConditionStatus::Unknown))
            .with_condition(Condition::new(ConditionType::Ready, ConditionStatus::True));

        assert_eq!(snapshot.status.conditions.len(), 1);
        assert!(snapshot.condition(&ConditionType::Ready).unwrap().is_true());
    }

    #[test]
    fn test_condition_type_round_trips_through_string() {
        let encoded = serde_json::to_value(ConditionType::ContainerHealthy).unwrap();
        assert_eq!(encoded, json!("ContainerHealthy"));
    }
}
