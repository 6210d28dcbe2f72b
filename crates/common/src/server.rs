//! Serve loop shared by the fixture binaries.

use crate::config::ServerConfig;
use crate::error::FixtureError;
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// Bind `config.bind_address` and serve `app` until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns `FixtureError` if the address does not parse, the listener
/// cannot be bound, or the server loop fails.
pub async fn run(app: Router, config: &ServerConfig) -> Result<(), FixtureError> {
    let addr: SocketAddr =
        config
            .bind_address
            .parse()
            .map_err(|source| FixtureError::InvalidAddress {
                address: config.bind_address.clone(),
                source,
            })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| FixtureError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.drain_period))
        .await
        .map_err(FixtureError::Serve)?;

    info!("Shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
/// Returns when a shutdown signal is received and the drain period is complete.
async fn shutdown_signal(drain_period: Duration) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    if drain_period.is_zero() {
        return;
    }

    warn!("Draining connections for {:?}...", drain_period);
    tokio::time::sleep(drain_period).await;
    info!("Drain period complete");
}
