//! Smoke Tests: Cluster Health
//!
//! These tests validate that kubectl can reach the cluster and that the
//! serving API and test namespace exist. All other tests depend on these passing.

#![cfg(feature = "smoke")]

use conformance::context::TestContext;

fn context() -> TestContext {
    TestContext::setup().expect("Invalid conformance configuration in environment")
}

#[tokio::test]
async fn test_serving_api_installed() {
    let context = context();

    context
        .client
        .check_serving_api()
        .await
        .expect("Serving CRDs should be installed in the cluster");
}

#[tokio::test]
async fn test_namespace_exists() {
    let context = context();

    context.client.check_namespace().await.unwrap_or_else(|e| {
        panic!(
            "Test namespace '{}' should exist: {}",
            context.config.namespace, e
        )
    });
}

#[tokio::test]
async fn test_missing_configuration_is_not_found() {
    let context = context();

    let err = context
        .client
        .get_configuration("does-not-exist-4a1f9c")
        .await
        .expect_err("Configuration should not exist");

    assert!(
        err.is_transient(),
        "Missing resources must be reported as NotFound, got: {}",
        err
    );
}
