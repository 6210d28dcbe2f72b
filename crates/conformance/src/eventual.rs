//! Eventual consistency helpers for status propagation tests.
//!
//! Serving resources report their state asynchronously: a controller writes
//! status conditions some time after the underlying pods change. This module
//! polls a resource until a `StatePredicate` settles, fails, or runs out of time.

use crate::matchers::{MismatchError, StatePredicate};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info, warn};

/// Stand-in deadline for timeouts too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Timing for a single wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Give up after this long.
    pub timeout: Duration,

    /// Pause between polls.
    pub interval: Duration,
}

impl PollSettings {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for PollSettings {
    /// 6 minute timeout with 1s interval, enough for a crash loop to surface
    /// through the kubelet back-off.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(360),
            interval: Duration::from_secs(1),
        }
    }
}

/// Why a wait ended without the expected state.
#[derive(Debug, Error)]
pub enum PollError {
    #[error(
        "{description}: state not reached within {timeout:?} after {attempts} attempts{}",
        last_error_suffix(.last_error)
    )]
    Timeout {
        description: String,
        timeout: Duration,
        attempts: u32,
        /// Most recent transient fetch failure, if the last polls failed to fetch.
        last_error: Option<String>,
    },

    #[error(transparent)]
    Mismatch(#[from] MismatchError),
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(" (last fetch error: {e})"),
        None => String::new(),
    }
}

/// Poll `fetch` until `predicate` settles.
///
/// - Fetch errors are treated as transient and retried after `settings.interval`.
/// - `Ok(false)` from the predicate keeps polling.
/// - `Ok(true)` returns the snapshot that satisfied it.
/// - `Err(MismatchError)` returns immediately, without further polls.
/// - Once `settings.timeout` has elapsed, returns `PollError::Timeout`.
///
/// A fetch that is still running at the deadline is abandoned.
///
/// # Example
///
/// ```no_run
/// use conformance::eventual::{poll_until, PollSettings};
/// use conformance::matchers::Readiness;
///
/// # async fn example(client: conformance::cluster::ServingClient) {
/// let snapshot = poll_until(
///     "ConfigurationIsReady",
///     PollSettings::default(),
///     || client.get_configuration("hello"),
///     &Readiness::ready(),
/// )
/// .await
/// .expect("Configuration should become ready");
/// # }
/// ```
#[tracing::instrument(skip_all, fields(description = %description))]
pub async fn poll_until<S, E, F, Fut, P>(
    description: &str,
    settings: PollSettings,
    mut fetch: F,
    predicate: &P,
) -> Result<S, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, E>>,
    E: Display,
    P: StatePredicate<S> + ?Sized,
{
    let start = Instant::now();
    let deadline = start
        .checked_add(settings.timeout)
        .unwrap_or_else(|| start + FAR_FUTURE);
    let mut attempts: u32 = 0;
    let mut last_error: Option<String> = None;

    loop {
        attempts += 1;

        match timeout_at(deadline, fetch()).await {
            Ok(Ok(snapshot)) => {
                last_error = None;
                match predicate.evaluate(&snapshot) {
                    Ok(true) => {
                        info!(attempts, elapsed = ?start.elapsed(), "Reached expected state");
                        return Ok(snapshot);
                    }
                    Ok(false) => {}
                    Err(mismatch) => {
                        warn!(
                            attempts,
                            kind = %mismatch.kind,
                            name = %mismatch.name,
                            reason = %mismatch.actual.reason,
                            message = %mismatch.actual.message,
                            status = %mismatch.actual.status,
                            "Unexpected terminal condition"
                        );
                        return Err(mismatch.into());
                    }
                }
                debug!(attempts, "State not settled yet");
            }
            Ok(Err(e)) => {
                warn!(attempts, error = %e, "Fetch failed, will retry");
                last_error = Some(e.to_string());
            }
            Err(_) => {
                warn!(attempts, "Fetch still running at deadline");
                last_error = Some("fetch did not complete before the deadline".to_string());
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(PollError::Timeout {
                description: description.to_string(),
                timeout: settings.timeout,
                attempts,
                last_error,
            });
        }

        sleep(settings.interval.min(deadline - now)).await;
    }
}
