//! Export sink writing log documents into a directory.

use std::fs;
use std::path::{Path, PathBuf};

use gymtrack_core::ExportSink;
use gymtrack_domain::{GymTrackError, Result};

use crate::errors::InfraError;

/// Writes each export as a file under `dir`, replacing same-day exports.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectoryExportSink {
    fn write(&self, file_name: &str, contents: &[u8]) -> Result<()> {
        let name = Path::new(file_name);
        if name.components().count() != 1 || name.file_name().is_none() {
            return Err(GymTrackError::InvalidInput(format!(
                "export file name must not contain a path: {file_name}"
            )));
        }

        fs::create_dir_all(&self.dir).map_err(InfraError::from)?;
        let path = self.dir.join(name);
        fs::write(&path, contents).map_err(InfraError::from)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Export written");
        Ok(())
    }
}
