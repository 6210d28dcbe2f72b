//! Probe target handlers.
//!
//! Each endpoint is meant to be pointed at by a Kubernetes probe:
//!
//! - `/healthy`: a probe that always succeeds
//! - `/unhealthy`: a probe that always fails
//! - `/healthz`: a liveness probe that starts failing once the process is
//!   older than the configured window, forcing the kubelet to restart it

use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::info;

/// Always healthy.
pub async fn healthy() -> (StatusCode, &'static str) {
    info!("Received healthy request...");
    (StatusCode::OK, "ok")
}

/// Always unhealthy.
pub async fn unhealthy() -> (StatusCode, &'static str) {
    info!("Received unhealthy request...");
    (StatusCode::INTERNAL_SERVER_ERROR, "not ok")
}

/// Healthy until the liveness window has elapsed.
///
/// After the window the body carries the elapsed seconds so the failure is
/// visible in probe events.
pub async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, String) {
    info!("Received healthz request...");

    let elapsed = state.started.elapsed();
    if elapsed > state.healthz_window {
        info!("healthz reported 500");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("error: {}", elapsed.as_secs_f64()),
        );
    }

    info!("healthz reported 200");
    (StatusCode::OK, "ok".to_string())
}
