//! Shared plumbing for the conformance fixture servers.

#![warn(clippy::pedantic)]

/// Module for fixture server configuration
pub mod config;

/// Module for common error types
pub mod error;

/// Module for tracing subscriber setup
pub mod observability;

/// Module for the serve loop and graceful shutdown
pub mod server;

/// Module for spawning fixture routers in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
