//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Event log
pub const LOG_STORAGE_SLOT: &str = "gym_tracker_logs";
pub const DEFAULT_MAX_LOGS: usize = 1000;
pub const EXPORT_FILE_PREFIX: &str = "gym_tracker";
pub const SESSION_ID_PREFIX: &str = "session";
pub const SESSION_ID_SUFFIX_LEN: usize = 9;
pub const UNKNOWN_VIEW: &str = "unknown";

// Query instrumentation
pub const DEFAULT_SLOW_QUERY_THRESHOLD_MS: u64 = 1000;
pub const DEFAULT_SELECT_COLUMNS: &str = "*";

// Workout timer
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_REST_SECONDS: u32 = 90;

// Configuration
pub const ENV_PREFIX: &str = "GYMTRACK";
