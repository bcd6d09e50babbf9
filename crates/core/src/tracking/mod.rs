//! Manual interaction tracking on top of the event log

pub mod service;

pub use service::UserTracker;
