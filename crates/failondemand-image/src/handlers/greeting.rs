//! Greeting and liveness handlers.

use crate::routes::AppState;
use axum::extract::State;
use std::sync::Arc;
use tracing::info;

/// Greets the configured target.
pub async fn hello(State(state): State<Arc<AppState>>) -> String {
    info!("Hello world received a request.");
    format!("Hello {}!\n", state.target)
}

/// Liveness endpoint. Stays healthy until the process is stopped.
pub async fn healthz() -> &'static str {
    info!("Received a health check request");
    "I'm still healthy"
}
