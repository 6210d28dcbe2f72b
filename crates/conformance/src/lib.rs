//! Serving Conformance Test Suite
//!
//! This crate checks that a serverless platform carries container lifecycle
//! events into status conditions. A revision whose container crashes or fails
//! its probes must say so on its `Ready` condition, and so must the
//! Configuration that owns it.
//!
//! The reusable piece is the convergence watcher in [`eventual`]: it polls a
//! resource and hands every snapshot to a [`matchers::StatePredicate`] until
//! the predicate settles or the deadline passes.
//!
//! # Features
//!
//! - `smoke`: kubectl reaches the cluster and the test namespace exists (seconds)
//! - `conformance`: probe and crash propagation scenarios (several minutes)
//! - `all`: Enable all test categories
//!
//! # Prerequisites
//!
//! 1. A cluster with the serving CRDs installed
//! 2. The test namespace created (`serving-tests` unless overridden)
//! 3. Test images (`failing`, `probe`) pushed to `SERVING_IMAGE_REPO`
//! 4. kubectl in PATH (or `KUBECTL` set)
//!
//! # Usage
//!
//! ```bash
//! # Unit tests only, no cluster needed
//! cargo test -p conformance
//!
//! # Smoke checks
//! cargo test -p conformance --features smoke
//!
//! # Full suite
//! cargo test -p conformance --features all
//! ```

pub mod cluster;
pub mod conditions;
pub mod config;
pub mod context;
pub mod eventual;
pub mod fixtures;
pub mod matchers;

/// Install a test-writer tracing subscriber.
///
/// Safe to call from every scenario; only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conformance=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
