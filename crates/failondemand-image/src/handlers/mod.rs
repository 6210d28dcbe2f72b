//! HTTP request handlers for the fail-on-demand fixture.

mod crash;
mod greeting;

pub use crash::stop;
pub use greeting::{healthz, hello};
