//! HTTP routes for the probe fixture.
//!
//! Defines the Axum router and application state.

use crate::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// When the process started serving.
    pub started: Instant,

    /// How long `/healthz` keeps reporting healthy.
    pub healthz_window: Duration,
}

impl AppState {
    /// State for a process starting now.
    pub fn new(healthz_window: Duration) -> Self {
        Self::started_at(Instant::now(), healthz_window)
    }

    /// State for a process that started at `started`.
    pub fn started_at(started: Instant, healthz_window: Duration) -> Self {
        Self {
            started,
            healthz_window,
        }
    }
}

/// Build the application routes.
///
/// - `/healthy` - Always 200 "ok"
/// - `/unhealthy` - Always 500 "not ok"
/// - `/healthz` - 200 "ok" inside the liveness window, 500 afterwards
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthy", get(handlers::healthy))
        .route("/unhealthy", get(handlers::unhealthy))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
