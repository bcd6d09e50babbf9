//! Event log store and its storage ports

pub mod ports;
pub mod session;
pub mod store;

pub use ports::{ExportSink, LogStorage};
pub use store::{EventLog, LogStoreConfig};
