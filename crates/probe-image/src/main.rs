//! Probe fixture server entry point.

use common::server;
use probe_image::config::Config;
use probe_image::routes::{self, AppState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::observability::init_tracing("probe_image=debug,tower_http=debug")?;

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.server.bind_address,
        healthz_window_secs = config.healthz_window.as_secs(),
        "Starting probe fixture"
    );

    let state = Arc::new(AppState::new(config.healthz_window));
    let app = routes::build_routes(state);

    server::run(app, &config.server).await.map_err(|e| {
        error!("Probe fixture failed: {}", e);
        e
    })?;

    Ok(())
}
