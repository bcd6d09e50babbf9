//! Global tracing subscriber initialization.

use gymtrack_domain::{GymTrackError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Target of the event log's console mirror.
pub const EVENT_LOG_TARGET: &str = "gymtrack::event_log";

/// Build the filter: `RUST_LOG` when set and valid, otherwise the configured
/// level. Production silences the event log mirror.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let mut directives = config.level.clone();
    if config.production {
        directives.push_str(&format!(",{EVENT_LOG_TARGET}=off"));
    }

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber, human-readable or JSON lines.
///
/// # Errors
/// Returns `GymTrackError::Internal` if a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json_output {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| GymTrackError::Internal(format!("Failed to install tracing subscriber: {e}")))
}
