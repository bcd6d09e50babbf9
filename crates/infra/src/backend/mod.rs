//! Table backends implementing the core query ports.

pub mod memory_backend;

pub use memory_backend::{InMemoryBackend, MemoryQuery};
