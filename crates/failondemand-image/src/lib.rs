//! Fail-on-demand fixture image.
//!
//! A disposable HTTP server that crashes when asked to. Conformance scenarios
//! hit `/stop` to make the container exit with a known code and log line,
//! then check that the crash surfaces in the platform's status conditions.
//!
//! # Modules
//!
//! - `config` - Greeting target and listener configuration
//! - `handlers` - HTTP request handlers
//! - `routes` - Router and application state
//! - `terminator` - Process exit seam

pub mod config;
pub mod handlers;
pub mod routes;
pub mod terminator;

/// Exit code used by `/stop`.
pub const CRASH_EXIT_CODE: i32 = 5;

/// Log line written by `/stop` right before exiting.
pub const CRASH_LOG_LINE: &str = "Crashed...";
