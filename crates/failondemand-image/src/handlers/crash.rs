//! Crash-on-demand handler.

use crate::routes::AppState;
use crate::{CRASH_EXIT_CODE, CRASH_LOG_LINE};
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::error;

/// Logs the crash marker and exits with `CRASH_EXIT_CODE`.
///
/// With the real terminator this never returns. The 503 is only observable
/// through a recording terminator.
pub async fn stop(State(state): State<Arc<AppState>>) -> StatusCode {
    error!("{}", CRASH_LOG_LINE);
    state.terminator.terminate(CRASH_EXIT_CODE);
    StatusCode::SERVICE_UNAVAILABLE
}
