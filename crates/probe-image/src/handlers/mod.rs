//! HTTP request handlers for the probe fixture.

mod health;

pub use health::{healthy, healthz, unhealthy};
