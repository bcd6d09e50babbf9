//! # GymTrack Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The bounded event log store
//! - The query instrumentation proxy
//! - The workout timer engine and service
//! - The interaction tracker
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `gymtrack-common` and `gymtrack-domain`
//! - No filesystem, network, or runtime code
//! - All external dependencies via traits
//! - Time comes from an injected [`Clock`](gymtrack_common::time::Clock)

pub mod logging;
pub mod query;
pub mod timer;
pub mod tracking;

pub use logging::{EventLog, ExportSink, LogStorage, LogStoreConfig};
pub use query::{LoggedClient, LoggedQuery, LoggedTable, QueryBuilder, TableBackend};
pub use timer::{TickOutcome, TimerEngine, WorkoutTimerService};
pub use tracking::UserTracker;
