//! Port interfaces for the event log
//!
//! The store persists its buffer into a single named slot and hands export
//! documents to a sink. Both calls happen inline with `append`, so the ports
//! are synchronous.

use gymtrack_domain::Result;

/// Key-value slot storage holding the serialized log buffer.
pub trait LogStorage: Send + Sync {
    /// Read the slot. `Ok(None)` when the slot has never been written.
    fn load(&self, slot: &str) -> Result<Option<String>>;

    /// Overwrite the slot wholesale.
    fn save(&self, slot: &str, payload: &str) -> Result<()>;

    /// Erase the slot. Removing a missing slot is not an error.
    fn remove(&self, slot: &str) -> Result<()>;
}

/// Destination for exported log documents.
pub trait ExportSink: Send + Sync {
    /// Write `contents` under `file_name`.
    fn write(&self, file_name: &str, contents: &[u8]) -> Result<()>;
}
