//! # GymTrack App
//!
//! Application layer - commands and composition root.
//!
//! This crate contains:
//! - Commands for the workout timer and the log viewer
//! - Application context (dependency injection)
//! - The headless `gymtrack` binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the ports in `core` to the adapters in `infra`

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
