//! Log viewer commands

use std::time::Instant;

use chrono::{DateTime, Utc};
use gymtrack_domain::{GymTrackError, LogCategory, LogEntry, LogLevel, LogStats, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::logging::{log_command_execution, outcome};
use crate::AppContext;

/// Viewer filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub category: Option<LogCategory>,
    /// Case-insensitive substring of the message or the serialized details.
    pub search: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if self.level.is_some_and(|level| level != entry.level) {
            return false;
        }
        if self.category.is_some_and(|category| category != entry.category) {
            return false;
        }
        if self.since.is_some_and(|since| entry.timestamp < since) {
            return false;
        }
        if self.until.is_some_and(|until| entry.timestamp > until) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                entry.message.to_lowercase().contains(&needle)
                    || entry
                        .details
                        .as_ref()
                        .is_some_and(|d| d.to_string().to_lowercase().contains(&needle))
            }
        }
    }
}

/// Entries matching `filter`, newest first.
pub fn get_logs(ctx: &AppContext, filter: &LogFilter) -> Vec<LogEntry> {
    let command_name = "logs::get_logs";
    let start = Instant::now();

    let mut entries: Vec<LogEntry> =
        ctx.event_log.get_all().into_iter().filter(|e| filter.matches(e)).collect();
    entries.reverse();

    info!(command = command_name, returned = entries.len(), "Logs listed");
    log_command_execution(command_name, start.elapsed(), Ok(()));
    entries
}

/// Counts by level and category over the whole buffer.
pub fn get_log_stats(ctx: &AppContext) -> LogStats {
    let command_name = "logs::get_log_stats";
    let start = Instant::now();

    let stats = ctx.event_log.stats();

    log_command_execution(command_name, start.elapsed(), Ok(()));
    stats
}

/// Write the export document and return its file name.
///
/// # Errors
/// Returns `GymTrackError::Storage` when the export could not be written;
/// the failure is also recorded in the log itself.
pub fn export_logs(ctx: &AppContext) -> Result<String> {
    let command_name = "logs::export_logs";
    let start = Instant::now();

    let result = ctx
        .event_log
        .export_snapshot()
        .ok_or_else(|| GymTrackError::Storage("log export failed".to_string()));

    log_command_execution(command_name, start.elapsed(), outcome(&result));
    result
}

/// Empty the log and its persisted slot.
pub fn clear_logs(ctx: &AppContext) {
    let command_name = "logs::clear_logs";
    let start = Instant::now();

    let cleared = ctx.event_log.len();
    ctx.event_log.clear();

    info!(command = command_name, cleared, "Logs cleared");
    log_command_execution(command_name, start.elapsed(), Ok(()));
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn entry(level: LogLevel, category: LogCategory, message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap(),
            level,
            category,
            action: "TEST".into(),
            message: message.into(),
            details: Some(json!({"table": "workout_sets"})),
            session_id: "session_1_abc".into(),
            user_id: None,
            duration: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let e = entry(LogLevel::Debug, LogCategory::Database, "anything");
        assert!(LogFilter::default().matches(&e));
    }

    #[test]
    fn level_and_category_must_both_match() {
        let e = entry(LogLevel::Warn, LogCategory::Performance, "Slow SELECT");
        let filter = LogFilter {
            level: Some(LogLevel::Warn),
            category: Some(LogCategory::Database),
            ..LogFilter::default()
        };
        assert!(!filter.matches(&e));
    }

    #[test]
    fn search_covers_message_and_details() {
        let e = entry(LogLevel::Info, LogCategory::Database, "select operation");
        let by_details = LogFilter { search: Some("WORKOUT_SETS".into()), ..LogFilter::default() };
        let miss = LogFilter { search: Some("bench".into()), ..LogFilter::default() };
        assert!(by_details.matches(&e));
        assert!(!miss.matches(&e));
    }

    #[test]
    fn time_window_is_inclusive() {
        let e = entry(LogLevel::Info, LogCategory::Feature, "tick");
        let filter = LogFilter {
            since: Some(e.timestamp),
            until: Some(e.timestamp),
            ..LogFilter::default()
        };
        assert!(filter.matches(&e));
    }
}
