//! Time utilities and abstractions
//!
//! - **[`clock`]**: real and mock clocks behind the [`Clock`] trait
//! - **[`format`]**: stopwatch and duration formatting
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use gymtrack_common::time::{format_clock, Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(75));
//!
//! let elapsed = clock.now().duration_since(start).as_secs();
//! assert_eq!(format_clock(elapsed), "1:15");
//! ```

pub mod clock;
pub mod format;

pub use clock::{Clock, MockClock, SystemClock};
pub use format::{format_clock, format_duration_ms};
