//! Integration tests for the bounded event log store.

mod support;

use gymtrack_core::LogStoreConfig;
use gymtrack_domain::constants::LOG_STORAGE_SLOT;
use gymtrack_domain::{LogCategory, LogEntry, LogExport, LogLevel};
use serde_json::json;
use support::Harness;

/// Validates `EventLog::append` behavior for the overflow scenario.
///
/// Assertions:
/// - The buffer never grows past `max_logs`
/// - The retained entries are the most recent ones, in call order
#[test]
fn overflow_keeps_most_recent_entries_in_order() {
    let harness = Harness::with_config(LogStoreConfig { max_logs: 5, ..LogStoreConfig::default() });

    for i in 0..12 {
        harness.log.log_info(LogCategory::Feature, &format!("ACTION_{i}"), "burst", None);
        assert!(harness.log.len() <= 5);
    }

    let expected: Vec<String> = (7..12).map(|i| format!("ACTION_{i}")).collect();
    assert_eq!(harness.actions(), expected);
}

/// Validates that the storage slot mirrors the buffer after every append.
///
/// Assertions:
/// - The persisted JSON array equals `get_all()` element for element
#[test]
fn persisted_slot_matches_buffer() {
    let harness = Harness::with_config(LogStoreConfig { max_logs: 3, ..LogStoreConfig::default() });

    for i in 0..4 {
        harness.log.log_warning(LogCategory::Performance, &format!("W{i}"), "slow", None);
        let persisted: Vec<LogEntry> =
            serde_json::from_str(&harness.storage.slot(LOG_STORAGE_SLOT).unwrap()).unwrap();
        assert_eq!(persisted, harness.log.get_all());
    }
}

/// Validates `EventLog::clear` behavior.
///
/// Assertions:
/// - The buffer is empty afterwards
/// - The storage slot is erased
/// - The session id survives
#[test]
fn clear_empties_buffer_and_slot() {
    let harness = Harness::new();
    let session = harness.log.session_id().to_string();
    harness.log.log_info(LogCategory::Navigation, "NAVIGATE", "to plans", None);
    assert!(harness.storage.slot(LOG_STORAGE_SLOT).is_some());

    harness.log.clear();

    assert!(harness.log.get_all().is_empty());
    assert!(harness.storage.slot(LOG_STORAGE_SLOT).is_none());
    assert_eq!(harness.log.session_id(), session);
}

/// Validates payload redaction on append.
///
/// Assertions:
/// - `password` and `nested.token` are replaced by the marker
/// - `name` is preserved verbatim
#[test]
fn details_are_redacted_before_storage() {
    let harness = Harness::new();
    harness.log.log_info(
        LogCategory::Auth,
        "AUTH_SIGNED_IN",
        "signed in",
        Some(json!({ "password": "x", "nested": { "token": "y" }, "name": "z" })),
    );

    let entry = &harness.log.get_all()[0];
    assert_eq!(
        entry.details,
        Some(json!({ "password": "[REDACTED]", "nested": { "token": "[REDACTED]" }, "name": "z" }))
    );
    assert!(!harness.storage.slot(LOG_STORAGE_SLOT).unwrap().contains("\"y\""));
}

/// Validates that storage failures never reach the caller.
///
/// Assertions:
/// - Appends keep working in memory while writes fail
#[test]
fn storage_failures_are_swallowed() {
    let harness = Harness::new();
    harness.storage.fail_writes(true);

    harness.log.log_error("offline", Some("SYNC"), None);
    harness.log.log_error("still offline", Some("SYNC"), None);

    assert_eq!(harness.log.len(), 2);
    assert!(harness.storage.slot(LOG_STORAGE_SLOT).is_none());
}

/// Validates `EventLog::export_snapshot` for the success scenario.
///
/// Assertions:
/// - The document carries session, user and every entry
/// - The file name follows `gym_tracker_logs_<date>.json`
/// - An `EXPORT_LOGS` entry is recorded afterwards with the count
#[test]
fn export_writes_document_and_records_itself() {
    let harness = Harness::new();
    harness.log.set_user_id("athlete-7");
    harness.log.log_user_interaction("CLICK", "start button", None);
    harness.log.log_performance("PAGE_LOAD", 420, None);

    let file_name = harness.log.export_snapshot().unwrap();
    assert_eq!(file_name, "gym_tracker_logs_2024-05-01.json");

    let files = harness.sink.files();
    assert_eq!(files.len(), 1);
    let document: LogExport = serde_json::from_slice(&files[0].1).unwrap();
    assert_eq!(document.session_id, harness.log.session_id());
    assert_eq!(document.user_id.as_deref(), Some("athlete-7"));
    assert_eq!(document.logs.len(), 2);

    let last = harness.log.get_all().pop().unwrap();
    assert_eq!(last.action, "EXPORT_LOGS");
    assert_eq!(last.category, LogCategory::UserInteraction);
    assert_eq!(last.details, Some(json!({ "log_count": 2, "file_name": file_name })));
}

/// Validates `EventLog::export_snapshot` when the sink rejects the file.
///
/// Assertions:
/// - `None` is returned
/// - An `error` entry with action `EXPORT_LOGS` is recorded
#[test]
fn export_failure_is_logged() {
    let harness = Harness::new();
    harness.sink.fail(true);

    assert!(harness.log.export_snapshot().is_none());

    let last = harness.log.get_all().pop().unwrap();
    assert_eq!(last.level, LogLevel::Error);
    assert_eq!(last.action, "EXPORT_LOGS");
}

/// Validates `EventLog::stats` aggregation.
///
/// Assertions:
/// - Totals and per-level / per-category counts match the appended entries
/// - The time range spans the first and last timestamps
#[test]
fn stats_summarize_buffer() {
    let harness = Harness::new();
    harness.log.log_info(LogCategory::Database, "DB_SELECT_START", "start", None);
    harness.clock.advance_secs(30);
    harness.log.log_debug(LogCategory::Database, "DB_FILTER_EQ", "filter", None);
    harness.log.log_error("boom", Some("DATABASE_SELECT"), None);

    let stats = harness.log.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_level.get("info"), Some(&1));
    assert_eq!(stats.by_level.get("debug"), Some(&1));
    assert_eq!(stats.by_category.get("database"), Some(&2));
    assert_eq!(stats.by_category.get("error"), Some(&1));

    let range = stats.time_range.unwrap();
    assert_eq!((range.newest - range.oldest).num_seconds(), 30);
}
