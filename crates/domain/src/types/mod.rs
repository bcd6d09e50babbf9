//! Domain types and models
//!
//! - [`log`]: event log entries, statistics, export documents and session info
//! - [`timer`]: workout timer identity, state and display model
//! - [`query`]: request/response shapes of the backend table API

pub mod log;
pub mod query;
pub mod timer;

pub use log::{LogCategory, LogEntry, LogExport, LogLevel, LogStats, SessionInfo, TimeRange};
pub use query::{BackendError, OrderOptions, QueryError, QueryOperation, QueryResponse};
pub use timer::{TimerId, TimerStatus, TimerType, TimerView};
