//! In-memory log storage for ephemeral runs and tests.

use std::collections::HashMap;

use gymtrack_core::LogStorage;
use gymtrack_domain::Result;
use parking_lot::RwLock;

/// Slot storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryLogStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryLogStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated slots.
    pub fn slot_count(&self) -> usize {
        self.slots.read().len()
    }
}

impl LogStorage for MemoryLogStorage {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.read().get(slot).cloned())
    }

    fn save(&self, slot: &str, payload: &str) -> Result<()> {
        self.slots.write().insert(slot.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        self.slots.write().remove(slot);
        Ok(())
    }
}
