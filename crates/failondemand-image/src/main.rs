//! Fail-on-demand fixture server entry point.

use common::server;
use failondemand_image::config::Config;
use failondemand_image::routes::{self, AppState};
use failondemand_image::terminator::ProcessTerminator;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::observability::init_tracing("failondemand_image=debug,tower_http=debug")?;

    info!("Started");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.server.bind_address,
        target = %config.target,
        "Configuration loaded successfully"
    );

    let state = Arc::new(AppState {
        target: config.target.clone(),
        terminator: Arc::new(ProcessTerminator),
    });
    let app = routes::build_routes(state);

    server::run(app, &config.server).await.map_err(|e| {
        error!("Fail-on-demand fixture failed: {}", e);
        e
    })?;

    Ok(())
}
