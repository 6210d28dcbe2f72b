//! Test fixtures for building serving resources.

pub mod configuration;
pub mod names;

pub use configuration::{ConfigurationOptions, HttpGetAction, Probe, ResourceNames};
pub use names::object_name_for_test;
