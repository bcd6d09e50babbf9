//! Storage adapters for the event log ports
//!
//! - [`FileLogStorage`]: one JSON file per slot, atomic replace on save
//! - [`MemoryLogStorage`]: process-local slots
//! - [`DirectoryExportSink`]: export documents written to a directory

pub mod export_sink;
pub mod file_storage;
pub mod memory_storage;

pub use export_sink::DirectoryExportSink;
pub use file_storage::FileLogStorage;
pub use memory_storage::MemoryLogStorage;
