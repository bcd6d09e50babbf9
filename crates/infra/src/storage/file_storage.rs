//! File-backed log storage slots.
//!
//! Each slot is `<dir>/<slot>.json`. Writes go to a sibling temporary file
//! that is then renamed over the slot, so a crash mid-write leaves the old
//! contents intact.

use std::fs;
use std::path::{Path, PathBuf};

use gymtrack_core::LogStorage;
use gymtrack_domain::{GymTrackError, Result};

use crate::errors::InfraError;

/// Slot storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileLogStorage {
    dir: PathBuf,
}

impl FileLogStorage {
    /// Create the storage, creating `dir` if needed.
    ///
    /// # Errors
    /// Returns `GymTrackError::Storage` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(InfraError::from)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        validate_slot(slot)?;
        Ok(self.dir.join(format!("{slot}.json")))
    }
}

impl LogStorage for FileLogStorage {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }

    fn save(&self, slot: &str, payload: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(InfraError::from)?;
        fs::rename(&tmp, &path).map_err(InfraError::from)?;
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

/// Slot names become file names; keep them to a safe alphabet.
fn validate_slot(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(GymTrackError::InvalidInput(format!("invalid storage slot name: {slot:?}")))
    }
}
