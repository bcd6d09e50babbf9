//! Scheduling infrastructure for background tasks
//!
//! - Timer ticker: drives the workout timer display on a fixed interval
//!
//! Schedulers keep explicit lifecycles (start/stop), hold join handles for
//! spawned tasks, and cancel through a `CancellationToken`.

pub mod error;
pub mod timer_ticker;

pub use error::{SchedulerError, SchedulerResult};
pub use timer_ticker::{TimerTicker, TimerTickerConfig};
