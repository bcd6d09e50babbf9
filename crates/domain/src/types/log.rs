//! Event log records and the views built from them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_domain_enum_conversions;

/* -------------------------------------------------------------------------- */
/* Level & Category */
/* -------------------------------------------------------------------------- */

/// Severity of a log entry, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl_domain_enum_conversions!(LogLevel {
    Error => "error",
    Warn => "warn",
    Info => "info",
    Debug => "debug",
});

impl LogLevel {
    const fn rank(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
        }
    }

    /// Returns `true` if an entry at this level passes a `minimum` filter.
    ///
    /// A minimum of `Info` admits `Error`, `Warn` and `Info`.
    pub const fn passes(self, minimum: Self) -> bool {
        self.rank() <= minimum.rank()
    }
}

/// Functional area a log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Database,
    UserInteraction,
    Navigation,
    Performance,
    Error,
    Feature,
    Auth,
}

impl_domain_enum_conversions!(LogCategory {
    Database => "database",
    UserInteraction => "user_interaction",
    Navigation => "navigation",
    Performance => "performance",
    Error => "error",
    Feature => "feature",
    Auth => "auth",
});

/* -------------------------------------------------------------------------- */
/* Entry */
/* -------------------------------------------------------------------------- */

/// One immutable event log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub category: LogCategory,
    /// Machine-readable tag such as `DB_SELECT_START`.
    pub action: String,
    pub message: String,
    /// Structured payload, already redacted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts-gen", ts(type = "unknown", optional))]
    pub details: Option<Value>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts-gen", ts(optional))]
    pub user_id: Option<String>,
    /// Elapsed milliseconds for timed operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number", optional))]
    pub duration: Option<u64>,
}

impl LogEntry {
    /// Developer console rendering: `[category] action: message`.
    pub fn console_line(&self) -> String {
        format!("[{}] {}: {}", self.category, self.action, self.message)
    }
}

/* -------------------------------------------------------------------------- */
/* Statistics */
/* -------------------------------------------------------------------------- */

/// Oldest and newest timestamps in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimeRange {
    pub oldest: DateTime<Utc>,
    pub newest: DateTime<Utc>,
}

/// Aggregate counts for the log viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct LogStats {
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub total: usize,
    #[cfg_attr(feature = "ts-gen", ts(type = "Record<string, number>"))]
    pub by_level: BTreeMap<String, usize>,
    #[cfg_attr(feature = "ts-gen", ts(type = "Record<string, number>"))]
    pub by_category: BTreeMap<String, usize>,
    /// `None` when the buffer is empty.
    pub time_range: Option<TimeRange>,
}

impl LogStats {
    /// Compute statistics over entries ordered oldest first.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let mut stats = Self::default();
        let mut first: Option<DateTime<Utc>> = None;
        let mut last: Option<DateTime<Utc>> = None;

        for entry in entries {
            stats.total += 1;
            *stats.by_level.entry(entry.level.to_string()).or_default() += 1;
            *stats.by_category.entry(entry.category.to_string()).or_default() += 1;
            first.get_or_insert(entry.timestamp);
            last = Some(entry.timestamp);
        }

        stats.time_range = first.zip(last).map(|(oldest, newest)| TimeRange { oldest, newest });
        stats
    }
}

/* -------------------------------------------------------------------------- */
/* Export */
/* -------------------------------------------------------------------------- */

/// Downloadable export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct LogExport {
    pub exported_at: DateTime<Utc>,
    pub session_id: String,
    pub user_id: Option<String>,
    pub logs: Vec<LogEntry>,
}

/* -------------------------------------------------------------------------- */
/* Session */
/* -------------------------------------------------------------------------- */

/// Snapshot of the interaction tracker's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct SessionInfo {
    pub session_id: String,
    /// View most recently navigated to; `unknown` before the first one.
    pub current_view: String,
    /// Milliseconds since the tracker was created.
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub session_duration_ms: u64,
    /// Milliseconds spent in the current view so far.
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub time_in_view_ms: u64,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn entry_at(secs: i64, level: LogLevel, category: LogCategory) -> LogEntry {
        LogEntry {
            timestamp: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            level,
            category,
            action: "TEST".into(),
            message: "test".into(),
            details: None,
            session_id: "session_1_abc".into(),
            user_id: None,
            duration: None,
        }
    }

    #[test]
    fn test_level_filter_ordering() {
        assert!(LogLevel::Error.passes(LogLevel::Info));
        assert!(LogLevel::Info.passes(LogLevel::Info));
        assert!(!LogLevel::Debug.passes(LogLevel::Info));
        assert!(LogLevel::Debug.passes(LogLevel::Debug));
    }

    #[test]
    fn test_entry_json_shape() {
        let mut entry = entry_at(0, LogLevel::Info, LogCategory::UserInteraction);
        entry.duration = Some(12);
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["level"], json!("info"));
        assert_eq!(value["category"], json!("user_interaction"));
        assert_eq!(value["duration"], json!(12));
        assert!(value.get("details").is_none());
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn test_console_line_format() {
        let entry = entry_at(0, LogLevel::Debug, LogCategory::Database);
        assert_eq!(entry.console_line(), "[database] TEST: test");
    }

    #[test]
    fn test_stats_counts_and_range() {
        let entries = vec![
            entry_at(0, LogLevel::Info, LogCategory::Database),
            entry_at(5, LogLevel::Debug, LogCategory::Database),
            entry_at(9, LogLevel::Error, LogCategory::Error),
        ];

        let stats = LogStats::from_entries(&entries);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_level.get("info"), Some(&1));
        assert_eq!(stats.by_level.get("debug"), Some(&1));
        assert_eq!(stats.by_category.get("database"), Some(&2));
        let range = stats.time_range.unwrap();
        assert_eq!(range.oldest, entries[0].timestamp);
        assert_eq!(range.newest, entries[2].timestamp);
    }

    #[test]
    fn test_stats_empty_has_no_range() {
        let stats = LogStats::from_entries(&Vec::<LogEntry>::new());
        assert_eq!(stats.total, 0);
        assert!(stats.time_range.is_none());
    }

    #[test]
    fn test_export_keeps_null_user() {
        let export = LogExport {
            exported_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            session_id: "session_1_abc".into(),
            user_id: None,
            logs: vec![],
        };
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["user_id"], json!(null));
        assert_eq!(value["exported_at"], json!("2023-11-14T22:13:20Z"));
    }
}
