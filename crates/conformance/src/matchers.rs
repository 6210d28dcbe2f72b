//! Condition matchers.
//!
//! A matcher inspects one condition of a `ResourceSnapshot` and decides whether
//! the poller is done. Every matcher follows the same contract:
//!
//! - `Ok(false)`: not decided yet, keep polling
//! - `Ok(true)`: the expected state was reached
//! - `Err(MismatchError)`: a terminal state was reached, but not the expected one
//!
//! A missing condition is always `Ok(false)`. Status propagation is eventually
//! consistent, so absence only means the controller has not written it yet.

use crate::conditions::{Condition, ConditionStatus, ConditionType, ResourceSnapshot};
use std::fmt;
use thiserror::Error;

/// Decides whether a polled state is terminal.
///
/// Implementations are pure: no I/O and no logging. The poller reports the
/// outcome.
pub trait StatePredicate<S: ?Sized> {
    fn evaluate(&self, snapshot: &S) -> Result<bool, MismatchError>;
}

impl<S: ?Sized, F> StatePredicate<S> for F
where
    F: Fn(&S) -> Result<bool, MismatchError>,
{
    fn evaluate(&self, snapshot: &S) -> Result<bool, MismatchError> {
        self(snapshot)
    }
}

/// What a matcher was waiting for. Unset fields were not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedCondition {
    pub reason: Option<String>,
    pub message: Option<String>,
    pub status: Option<ConditionStatus>,
}

impl fmt::Display for ExpectedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(reason) = &self.reason {
            parts.push(format!("Reason={reason:?}"));
        }
        if let Some(message) = &self.message {
            parts.push(format!("Message containing {message:?}"));
        }
        if let Some(status) = &self.status {
            parts.push(format!("Status=\"{status}\""));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// A terminal condition that is not the one the scenario expected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "The {kind} {name} was not marked with expected {condition_type} condition ({expected}), \
     but with ({actual})"
)]
pub struct MismatchError {
    pub kind: String,
    pub name: String,
    pub condition_type: ConditionType,
    pub expected: ExpectedCondition,
    pub actual: Condition,
}

impl MismatchError {
    fn new(snapshot: &ResourceSnapshot, expected: ExpectedCondition, actual: &Condition) -> Self {
        Self {
            kind: snapshot.kind.clone(),
            name: snapshot.name().to_string(),
            condition_type: actual.condition_type.clone(),
            expected,
            actual: actual.clone(),
        }
    }
}

/// Waits for a condition to go `False` with a crash message.
///
/// Fails fast on any other settled state, including `True`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashDetection {
    pub condition_type: ConditionType,
    pub expected_message: String,
}

impl CrashDetection {
    /// Watch the `Ready` condition for `expected_message`.
    pub fn ready(expected_message: impl Into<String>) -> Self {
        Self {
            condition_type: ConditionType::Ready,
            expected_message: expected_message.into(),
        }
    }

    fn expected(&self) -> ExpectedCondition {
        ExpectedCondition {
            reason: None,
            message: Some(self.expected_message.clone()),
            status: Some(ConditionStatus::False),
        }
    }
}

impl StatePredicate<ResourceSnapshot> for CrashDetection {
    fn evaluate(&self, snapshot: &ResourceSnapshot) -> Result<bool, MismatchError> {
        let Some(condition) = snapshot.condition(&self.condition_type) else {
            return Ok(false);
        };
        if condition.is_unknown() {
            return Ok(false);
        }
        if condition.is_false() && condition.message.contains(&self.expected_message) {
            return Ok(true);
        }
        Err(MismatchError::new(snapshot, self.expected(), condition))
    }
}

/// Waits for a condition to become `True`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub condition_type: ConditionType,
}

impl Readiness {
    /// Watch the `Ready` condition.
    pub fn ready() -> Self {
        Self {
            condition_type: ConditionType::Ready,
        }
    }
}

impl StatePredicate<ResourceSnapshot> for Readiness {
    fn evaluate(&self, snapshot: &ResourceSnapshot) -> Result<bool, MismatchError> {
        let Some(condition) = snapshot.condition(&self.condition_type) else {
            return Ok(false);
        };
        match condition.status {
            ConditionStatus::True => Ok(true),
            ConditionStatus::Unknown => Ok(false),
            ConditionStatus::False => Err(MismatchError::new(
                snapshot,
                ExpectedCondition {
                    status: Some(ConditionStatus::True),
                    ..Default::default()
                },
                condition,
            )),
        }
    }
}

/// Waits for a condition with an exact reason and a message substring.
///
/// Any reported condition that does not match is terminal, even `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionError {
    pub condition_type: ConditionType,
    pub expected_reason: String,
    pub expected_message: String,
}

impl RevisionError {
    /// Watch the `Ready` condition for `expected_reason` and `expected_message`.
    pub fn ready(expected_reason: impl Into<String>, expected_message: impl Into<String>) -> Self {
        Self {
            condition_type: ConditionType::Ready,
            expected_reason: expected_reason.into(),
            expected_message: expected_message.into(),
        }
    }
}

impl StatePredicate<ResourceSnapshot> for RevisionError {
    fn evaluate(&self, snapshot: &ResourceSnapshot) -> Result<bool, MismatchError> {
        let Some(condition) = snapshot.condition(&self.condition_type) else {
            return Ok(false);
        };
        if condition.reason == self.expected_reason
            && condition.message.contains(&self.expected_message)
        {
            return Ok(true);
        }
        Err(MismatchError::new(
            snapshot,
            ExpectedCondition {
                reason: Some(self.expected_reason.clone()),
                message: Some(self.expected_message.clone()),
                status: None,
            },
            condition,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRASHED: &str = "Crashed...";

    fn with_ready(status: ConditionStatus, reason: &str, message: &str) -> ResourceSnapshot {
        ResourceSnapshot::new("Configuration", "crashy").with_condition(
            Condition::new(ConditionType::Ready, status)
                .with_reason(reason)
                .with_message(message),
        )
    }

    fn absent() -> ResourceSnapshot {
        ResourceSnapshot::new("Configuration", "crashy").with_condition(Condition::new(
            ConditionType::ContainerHealthy,
            ConditionStatus::False,
        ))
    }

    #[test]
    fn test_all_matchers_pending_when_condition_absent() {
        let snapshot = absent();

        assert_eq!(CrashDetection::ready(CRASHED).evaluate(&snapshot), Ok(false));
        assert_eq!(Readiness::ready().evaluate(&snapshot), Ok(false));
        assert_eq!(
            RevisionError::ready("ExitCode5", CRASHED).evaluate(&snapshot),
            Ok(false)
        );
    }

    #[test]
    fn test_crash_detection_matches_false_with_message() {
        let snapshot = with_ready(
            ConditionStatus::False,
            "RevisionFailed",
            "Container failed with: Crashed...",
        );
        assert_eq!(CrashDetection::ready(CRASHED).evaluate(&snapshot), Ok(true));
    }

    #[test]
    fn test_crash_detection_pending_while_unknown() {
        let snapshot = with_ready(ConditionStatus::Unknown, "Deploying", "");
        assert_eq!(CrashDetection::ready(CRASHED).evaluate(&snapshot), Ok(false));
    }

    #[test]
    fn test_crash_detection_rejects_false_without_message() {
        let snapshot = with_ready(ConditionStatus::False, "RevisionFailed", "OOMKilled");

        let err = CrashDetection::ready(CRASHED)
            .evaluate(&snapshot)
            .expect_err("message without crash marker is a mismatch");

        assert_eq!(err.actual.message, "OOMKilled");
        assert_eq!(err.expected.status, Some(ConditionStatus::False));
        assert!(err.to_string().contains("crashy"));
        assert!(err.to_string().contains("OOMKilled"));
    }

    #[test]
    fn test_crash_detection_rejects_true_even_with_message() {
        let snapshot = with_ready(ConditionStatus::True, "", CRASHED);
        assert!(CrashDetection::ready(CRASHED).evaluate(&snapshot).is_err());
    }

    #[test]
    fn test_readiness_states() {
        let matcher = Readiness::ready();

        assert_eq!(
            matcher.evaluate(&with_ready(ConditionStatus::True, "", "")),
            Ok(true)
        );
        assert_eq!(
            matcher.evaluate(&with_ready(ConditionStatus::Unknown, "Deploying", "")),
            Ok(false)
        );

        let err = matcher
            .evaluate(&with_ready(ConditionStatus::False, "RevisionFailed", "boom"))
            .expect_err("False is terminal for readiness");
        assert_eq!(err.actual.status, ConditionStatus::False);
        assert!(err.to_string().contains("Status=\"True\""));
    }

    #[test]
    fn test_revision_error_matches_reason_and_message() {
        let snapshot = with_ready(
            ConditionStatus::False,
            "ExitCode5",
            "Container failed with: Crashed...",
        );
        assert_eq!(
            RevisionError::ready("ExitCode5", CRASHED).evaluate(&snapshot),
            Ok(true)
        );
    }

    #[test]
    fn test_revision_error_fails_fast_on_other_reason() {
        let matcher = RevisionError::ready("ExitCode5", CRASHED);

        let early = with_ready(ConditionStatus::Unknown, "Deploying", "");
        let err = matcher
            .evaluate(&early)
            .expect_err("any reported condition is terminal");
        assert_eq!(err.actual.reason, "Deploying");
        assert_eq!(err.expected.reason.as_deref(), Some("ExitCode5"));

        let wrong_message = with_ready(ConditionStatus::False, "ExitCode5", "other");
        assert!(matcher.evaluate(&wrong_message).is_err());
    }

    #[test]
    fn test_matchers_are_idempotent() {
        let snapshots = [
            absent(),
            with_ready(ConditionStatus::Unknown, "", ""),
            with_ready(ConditionStatus::False, "ExitCode5", CRASHED),
            with_ready(ConditionStatus::True, "", ""),
        ];
        let crash = CrashDetection::ready(CRASHED);
        let ready = Readiness::ready();
        let revision = RevisionError::ready("ExitCode5", CRASHED);

        for snapshot in &snapshots {
            assert_eq!(crash.evaluate(snapshot), crash.evaluate(snapshot));
            assert_eq!(ready.evaluate(snapshot), ready.evaluate(snapshot));
            assert_eq!(revision.evaluate(snapshot), revision.evaluate(snapshot));
        }
    }

    #[test]
    fn test_closures_are_predicates() {
        let always_done = |_: &ResourceSnapshot| -> Result<bool, MismatchError> { Ok(true) };
        assert_eq!(always_done.evaluate(&absent()), Ok(true));
    }
}
