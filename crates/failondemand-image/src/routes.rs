//! HTTP routes for the fail-on-demand fixture.
//!
//! Defines the Axum router and application state.

use crate::handlers;
use crate::terminator::Terminator;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Name used by `/hello`.
    pub target: String,

    /// Exit seam used by `/stop`.
    pub terminator: Arc<dyn Terminator>,
}

/// Build the application routes.
///
/// - `/hello` - Greeting using the configured target
/// - `/stop` - Logs "Crashed..." and exits with code 5
/// - `/healthz` - Always 200
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/hello", get(handlers::hello))
        .route("/stop", get(handlers::stop))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
