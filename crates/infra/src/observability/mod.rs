//! Observability infrastructure: tracing subscriber setup
//!
//! The event log mirrors every entry as a tracing event under
//! [`EVENT_LOG_TARGET`]; everything else uses the crate module paths.

pub mod tracing_setup;

pub use tracing_setup::{build_filter, init_tracing, EVENT_LOG_TARGET};
