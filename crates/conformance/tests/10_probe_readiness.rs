//! Readiness Tests
//!
//! A revision whose probes succeed must report `Ready=True` on its
//! Configuration.

#![cfg(feature = "conformance")]

use conformance::context::TestContext;
use conformance::fixtures::{object_name_for_test, ConfigurationOptions, Probe, ResourceNames};
use conformance::matchers::Readiness;

const PROBE_IMAGE: &str = "probe";

async fn assert_becomes_ready(test_name: &str, options: ConfigurationOptions) {
    let context = TestContext::setup().expect("Invalid conformance configuration in environment");
    let names = ResourceNames::new(object_name_for_test(test_name), PROBE_IMAGE);

    let _teardown = context
        .create_configuration(&names, &options)
        .await
        .unwrap_or_else(|e| panic!("Failed to create configuration {}: {}", names.config, e));

    context
        .client
        .wait_for_configuration_state(&names.config, &Readiness::ready(), "ConfigurationIsReady")
        .await
        .unwrap_or_else(|e| panic!("Configuration {} never became ready: {}", names.config, e));
}

#[tokio::test]
async fn test_readiness_probe_on_healthy_endpoint() {
    assert_becomes_ready(
        "probe_readiness_healthy",
        ConfigurationOptions {
            readiness_probe: Some(Probe::http_get_path("/healthy")),
            ..Default::default()
        },
    )
    .await;
}

#[tokio::test]
async fn test_liveness_probe_on_healthy_endpoint() {
    assert_becomes_ready(
        "probe_liveness_healthy",
        ConfigurationOptions {
            liveness_probe: Some(Probe::http_get_path("/healthy")),
            ..Default::default()
        },
    )
    .await;
}
