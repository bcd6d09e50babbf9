//! Commands - UI to backend bridge
//!
//! Each command times itself and reports through
//! [`log_command_execution`](crate::utils::logging::log_command_execution).

mod logs;
mod timer;
mod tracking;

pub use logs::*;
pub use timer::*;
pub use tracking::*;
