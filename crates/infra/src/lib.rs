//! # GymTrack Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Log storage slots (file and in-memory) and the export directory sink
//! - An in-memory table backend for the query ports
//! - The tokio tick driver for the workout timer
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `gymtrack-core`
//! - Depends on `gymtrack-domain` and `gymtrack-core`
//! - Contains all "impure" code (filesystem, tasks, global subscriber)

pub mod backend;
pub mod config;
pub mod errors;
pub mod observability;
pub mod scheduling;
pub mod storage;

// Re-export commonly used items
pub use backend::{InMemoryBackend, MemoryQuery};
pub use errors::InfraError;
pub use scheduling::{SchedulerError, SchedulerResult, TimerTicker, TimerTickerConfig};
pub use storage::{DirectoryExportSink, FileLogStorage, MemoryLogStorage};
