//! Probe fixture image.
//!
//! A disposable HTTP server used as the container image in probe conformance
//! scenarios. It exposes one always-healthy endpoint, one always-failing
//! endpoint, and one endpoint that starts failing once the process has been
//! alive longer than the liveness window.
//!
//! # Modules
//!
//! - `config` - Liveness window and listener configuration
//! - `handlers` - HTTP request handlers
//! - `routes` - Router and application state

pub mod config;
pub mod handlers;
pub mod routes;
