use std::time::Duration;

use gymtrack_domain::GymTrackError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"timer::start_timer"`).
/// * `elapsed` - Duration the command execution took.
/// * `outcome` - `Ok(())` or the error label of the failure.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, outcome: Result<(), &str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(()) => info!(command, duration_ms, "command_execution_success"),
        Err(error_type) => {
            warn!(command, duration_ms, error_type, "command_execution_failure");
        }
    }
}

/// Reduce a command result to the outcome [`log_command_execution`] expects.
#[inline]
pub fn outcome<T>(result: &Result<T, GymTrackError>) -> Result<(), &'static str> {
    match result {
        Ok(_) => Ok(()),
        Err(err) => Err(err.label()),
    }
}
