//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_LOGS, DEFAULT_SLOW_QUERY_THRESHOLD_MS, DEFAULT_TICK_INTERVAL_MS,
};
use crate::types::LogLevel;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub timer: TimerConfig,
    pub backend: BackendConfig,
}

/// Event log and diagnostics configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Ring-buffer capacity of the event log.
    pub max_logs: usize,
    /// Directory holding the persisted log slot.
    pub storage_dir: String,
    /// Directory exports are written to.
    pub export_dir: String,
    /// Production builds drop debug entries and silence the console mirror.
    pub production: bool,
    /// Least severe level the event log records.
    pub minimum_level: LogLevel,
    /// Default tracing filter directive (overridden by `RUST_LOG`).
    pub level: String,
    /// Emit tracing output as JSON lines.
    pub json_output: bool,
    /// Queries slower than this emit a performance warning.
    pub slow_query_threshold_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_logs: DEFAULT_MAX_LOGS,
            storage_dir: ".gymtrack".to_string(),
            export_dir: ".".to_string(),
            production: false,
            minimum_level: LogLevel::Debug,
            level: "info".to_string(),
            json_output: false,
            slow_query_threshold_ms: DEFAULT_SLOW_QUERY_THRESHOLD_MS,
        }
    }
}

/// Workout timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Interval between display ticks.
    pub tick_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { tick_interval_ms: DEFAULT_TICK_INTERVAL_MS }
    }
}

/// Hosted backend connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub anon_key: Option<String>,
}
