//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use gymtrack_domain::GymTrackError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GymTrackError);

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

impl From<InfraError> for GymTrackError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GymTrackError> for InfraError {
    fn from(value: GymTrackError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoGymTrackError {
    fn into_gymtrack(self) -> GymTrackError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → GymTrackError */
/* -------------------------------------------------------------------------- */

impl IntoGymTrackError for IoError {
    fn into_gymtrack(self) -> GymTrackError {
        match self.kind() {
            ErrorKind::NotFound => GymTrackError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                GymTrackError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::InvalidData | ErrorKind::InvalidInput => {
                GymTrackError::InvalidInput(self.to_string())
            }
            _ => GymTrackError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_gymtrack())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → GymTrackError */
/* -------------------------------------------------------------------------- */

impl IntoGymTrackError for JsonError {
    fn into_gymtrack(self) -> GymTrackError {
        if self.is_io() {
            GymTrackError::Storage(format!("json i/o failure: {self}"))
        } else {
            GymTrackError::Serialization(format!(
                "invalid json at line {} column {}: {self}",
                self.line(),
                self.column()
            ))
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_gymtrack())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → GymTrackError */
/* -------------------------------------------------------------------------- */

impl IntoGymTrackError for TomlError {
    fn into_gymtrack(self) -> GymTrackError {
        GymTrackError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_gymtrack())
    }
}
