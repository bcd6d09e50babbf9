//! Bounded event log shared by the query proxy, the timer and the UI.
//!
//! Entries live in a ring buffer capped at `max_logs`. Every append rewrites
//! the whole buffer into the storage slot while the buffer lock is held, so
//! the persisted slot always matches the in-memory order. Instrumentation
//! never fails the caller: storage and export errors end up as tracing
//! warnings (outside production) or error entries.

use std::sync::Arc;

use gymtrack_common::time::Clock;
use gymtrack_common::{RingBuffer, Redactor};
use gymtrack_domain::constants::{DEFAULT_MAX_LOGS, EXPORT_FILE_PREFIX, LOG_STORAGE_SLOT};
use gymtrack_domain::{
    GymTrackError, LogCategory, LogEntry, LogExport, LogLevel, LogStats, LoggingConfig,
};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

use super::ports::{ExportSink, LogStorage};
use super::session::generate_session_id;

/// Runtime options of an [`EventLog`].
#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    /// Buffer capacity; older entries are evicted first.
    pub max_logs: usize,
    /// Drops debug entries and silences the console mirror.
    pub production: bool,
    /// Entries below this level are ignored by [`EventLog::record`].
    pub minimum_level: LogLevel,
    /// Storage slot name.
    pub slot: String,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            max_logs: DEFAULT_MAX_LOGS,
            production: false,
            minimum_level: LogLevel::Debug,
            slot: LOG_STORAGE_SLOT.to_string(),
        }
    }
}

impl From<&LoggingConfig> for LogStoreConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            max_logs: config.max_logs,
            production: config.production,
            minimum_level: config.minimum_level,
            ..Self::default()
        }
    }
}

struct Inner {
    buffer: RingBuffer<LogEntry>,
    user_id: Option<String>,
}

/// Append-only, bounded, persisted event log.
pub struct EventLog {
    inner: Mutex<Inner>,
    session_id: String,
    config: LogStoreConfig,
    storage: Arc<dyn LogStorage>,
    export_sink: Arc<dyn ExportSink>,
    clock: Arc<dyn Clock>,
    redactor: Redactor,
}

impl EventLog {
    /// Create a store, hydrating the buffer from the storage slot.
    pub fn new(
        config: LogStoreConfig,
        storage: Arc<dyn LogStorage>,
        export_sink: Arc<dyn ExportSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let buffer = hydrate(&config, storage.as_ref());
        let session_id = generate_session_id(clock.millis_since_epoch());

        tracing::debug!(
            session_id = %session_id,
            restored = buffer.len(),
            max_logs = buffer.capacity(),
            "Event log initialized"
        );

        Self {
            inner: Mutex::new(Inner { buffer, user_id: None }),
            session_id,
            config,
            storage,
            export_sink,
            clock,
            redactor: Redactor::default(),
        }
    }

    /// Session id shared by every entry of this store.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Active configuration.
    pub fn config(&self) -> &LogStoreConfig {
        &self.config
    }

    /// Clock used for entry timestamps.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Redactor applied to every entry's details.
    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Push an entry, evicting the oldest past capacity, and persist.
    pub fn append(&self, mut entry: LogEntry) {
        if self.config.production && entry.level == LogLevel::Debug {
            return;
        }
        entry.details = entry.details.map(|details| self.redactor.redact(&details));

        let line = (!self.config.production).then(|| entry.console_line());
        let level = entry.level;
        let details = entry.details.clone();

        {
            let mut inner = self.inner.lock();
            inner.buffer.push(entry);
            self.persist(&inner.buffer);
        }

        if let Some(line) = line {
            mirror(level, &line, details.as_ref());
        }
    }

    /// Build an entry stamped with the clock, session and current user, then
    /// append it.
    pub fn record(
        &self,
        level: LogLevel,
        category: LogCategory,
        action: impl Into<String>,
        message: impl Into<String>,
        details: Option<Value>,
        duration: Option<u64>,
    ) {
        if !level.passes(self.config.minimum_level) {
            return;
        }

        let entry = LogEntry {
            timestamp: self.clock.utc_now(),
            level,
            category,
            action: action.into(),
            message: message.into(),
            details,
            session_id: self.session_id.clone(),
            user_id: self.user_id(),
            duration,
        };
        self.append(entry);
    }

    /// Snapshot of every entry, oldest first.
    pub fn get_all(&self) -> Vec<LogEntry> {
        self.inner.lock().buffer.to_vec()
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.inner.lock().buffer.len()
    }

    /// `true` when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().buffer.is_empty()
    }

    /// Empty the buffer and erase the storage slot. The session id is kept.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.buffer.clear();
        if let Err(err) = self.storage.remove(&self.config.slot) {
            self.warn_storage("clear", &err);
        }
    }

    /// Attach a user id to entries created from now on.
    pub fn set_user_id(&self, user_id: impl Into<String>) {
        self.inner.lock().user_id = Some(user_id.into());
    }

    /// Stop attaching a user id.
    pub fn clear_user_id(&self) {
        self.inner.lock().user_id = None;
    }

    /// Current user id, if set.
    pub fn user_id(&self) -> Option<String> {
        self.inner.lock().user_id.clone()
    }

    /// Counts by level and category plus the covered time range.
    pub fn stats(&self) -> LogStats {
        let inner = self.inner.lock();
        LogStats::from_entries(inner.buffer.iter())
    }

    /// Write the export document through the sink and return its file name.
    ///
    /// Failures are recorded as an `EXPORT_LOGS` error entry and yield `None`.
    pub fn export_snapshot(&self) -> Option<String> {
        let document = {
            let inner = self.inner.lock();
            LogExport {
                exported_at: self.clock.utc_now(),
                session_id: self.session_id.clone(),
                user_id: inner.user_id.clone(),
                logs: inner.buffer.to_vec(),
            }
        };
        let file_name = export_file_name(&document);
        let log_count = document.logs.len();

        let written = serde_json::to_vec_pretty(&document)
            .map_err(GymTrackError::from)
            .and_then(|bytes| self.export_sink.write(&file_name, &bytes));

        match written {
            Ok(()) => {
                tracing::info!(file_name = %file_name, log_count, "Logs exported");
                self.log_info(
                    LogCategory::UserInteraction,
                    "EXPORT_LOGS",
                    "User exported logs",
                    Some(json!({ "log_count": log_count, "file_name": file_name })),
                );
                Some(file_name)
            }
            Err(err) => {
                self.log_error(&err.to_string(), Some("EXPORT_LOGS"), None);
                None
            }
        }
    }

    /// `error`/`error` entry; `context` becomes the action.
    pub fn log_error(&self, message: &str, context: Option<&str>, details: Option<Value>) {
        self.record(
            LogLevel::Error,
            LogCategory::Error,
            context.unwrap_or("UNKNOWN_ERROR"),
            message,
            details,
            None,
        );
    }

    /// `warn` entry in `category`.
    pub fn log_warning(
        &self,
        category: LogCategory,
        action: &str,
        message: &str,
        details: Option<Value>,
    ) {
        self.record(LogLevel::Warn, category, action, message, details, None);
    }

    /// `info` entry in `category`.
    pub fn log_info(
        &self,
        category: LogCategory,
        action: &str,
        message: &str,
        details: Option<Value>,
    ) {
        self.record(LogLevel::Info, category, action, message, details, None);
    }

    /// `debug` entry in `category`.
    pub fn log_debug(
        &self,
        category: LogCategory,
        action: &str,
        message: &str,
        details: Option<Value>,
    ) {
        self.record(LogLevel::Debug, category, action, message, details, None);
    }

    /// `performance`/`info` entry carrying `duration_ms`.
    pub fn log_performance(&self, action: &str, duration_ms: u64, details: Option<Value>) {
        self.record(
            LogLevel::Info,
            LogCategory::Performance,
            action,
            format!("Operation completed in {duration_ms}ms"),
            details,
            Some(duration_ms),
        );
    }

    /// `user_interaction`/`info` entry; `element` goes into the details.
    pub fn log_user_interaction(&self, action: &str, element: &str, details: Option<Value>) {
        self.record(
            LogLevel::Info,
            LogCategory::UserInteraction,
            action,
            format!("User interacted with {element}"),
            details,
            None,
        );
    }

    /// `navigation`/`NAVIGATE` entry; extra `details` keys are merged in.
    pub fn log_navigation(&self, from: &str, to: &str, method: &str, details: Option<Value>) {
        let mut payload = Map::new();
        payload.insert("from".into(), json!(from));
        payload.insert("to".into(), json!(to));
        payload.insert("method".into(), json!(method));
        match details {
            Some(Value::Object(extra)) => payload.extend(extra),
            Some(other) => {
                payload.insert("extra".into(), other);
            }
            None => {}
        }

        self.record(
            LogLevel::Info,
            LogCategory::Navigation,
            "NAVIGATE",
            format!("Navigation from {from} to {to}"),
            Some(Value::Object(payload)),
            None,
        );
    }

    /// `database`/`info` entry with action `DB_<OPERATION>`.
    pub fn log_database_operation(
        &self,
        operation: &str,
        table: &str,
        details: Option<Value>,
        duration_ms: Option<u64>,
    ) {
        self.record(
            LogLevel::Info,
            LogCategory::Database,
            format!("DB_{}", operation.to_uppercase()),
            format!("{operation} operation on {table}"),
            details,
            duration_ms,
        );
    }

    fn persist(&self, buffer: &RingBuffer<LogEntry>) {
        let entries: Vec<&LogEntry> = buffer.iter().collect();
        let saved = serde_json::to_string(&entries)
            .map_err(GymTrackError::from)
            .and_then(|payload| self.storage.save(&self.config.slot, &payload));
        if let Err(err) = saved {
            self.warn_storage("persist", &err);
        }
    }

    fn warn_storage(&self, operation: &'static str, err: &GymTrackError) {
        if !self.config.production {
            tracing::warn!(slot = %self.config.slot, operation, error = %err, "Event log storage failed");
        }
    }
}

fn hydrate(config: &LogStoreConfig, storage: &dyn LogStorage) -> RingBuffer<LogEntry> {
    let restored = match storage.load(&config.slot) {
        Ok(Some(payload)) => serde_json::from_str::<Vec<LogEntry>>(&payload).map_err(GymTrackError::from),
        Ok(None) => Ok(Vec::new()),
        Err(err) => Err(err),
    };

    match restored {
        Ok(entries) => RingBuffer::from_tail(config.max_logs, entries),
        Err(err) => {
            if !config.production {
                tracing::warn!(slot = %config.slot, error = %err, "Failed to load logs from storage");
            }
            RingBuffer::new(config.max_logs)
        }
    }
}

fn export_file_name(document: &LogExport) -> String {
    format!("{EXPORT_FILE_PREFIX}_logs_{}.json", document.exported_at.format("%Y-%m-%d"))
}

fn mirror(level: LogLevel, line: &str, details: Option<&Value>) {
    let details = details.map(Value::to_string).unwrap_or_default();
    match level {
        LogLevel::Error => tracing::error!(target: "gymtrack::event_log", details = %details, "{line}"),
        LogLevel::Warn => tracing::warn!(target: "gymtrack::event_log", details = %details, "{line}"),
        LogLevel::Info => tracing::info!(target: "gymtrack::event_log", details = %details, "{line}"),
        LogLevel::Debug => tracing::debug!(target: "gymtrack::event_log", details = %details, "{line}"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use gymtrack_common::time::MockClock;

    use super::*;

    #[derive(Default)]
    struct SlotMap {
        slots: Mutex<HashMap<String, String>>,
    }

    impl LogStorage for SlotMap {
        fn load(&self, slot: &str) -> gymtrack_domain::Result<Option<String>> {
            Ok(self.slots.lock().get(slot).cloned())
        }

        fn save(&self, slot: &str, payload: &str) -> gymtrack_domain::Result<()> {
            self.slots.lock().insert(slot.to_string(), payload.to_string());
            Ok(())
        }

        fn remove(&self, slot: &str) -> gymtrack_domain::Result<()> {
            self.slots.lock().remove(slot);
            Ok(())
        }
    }

    struct NullSink;

    impl ExportSink for NullSink {
        fn write(&self, _file_name: &str, _contents: &[u8]) -> gymtrack_domain::Result<()> {
            Ok(())
        }
    }

    fn store(config: LogStoreConfig, storage: Arc<SlotMap>) -> EventLog {
        let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap());
        EventLog::new(config, storage, Arc::new(NullSink), Arc::new(clock))
    }

    #[test]
    fn test_minimum_level_comes_from_logging_config() {
        let logging = LoggingConfig { minimum_level: LogLevel::Warn, ..LoggingConfig::default() };
        let log = store(LogStoreConfig::from(&logging), Arc::new(SlotMap::default()));

        log.log_info(LogCategory::Feature, "DROPPED", "below minimum", None);
        log.log_warning(LogCategory::Performance, "KEPT", "at minimum", None);
        log.log_error("boom", Some("ALSO_KEPT"), None);

        let actions: Vec<String> = log.get_all().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, ["KEPT", "ALSO_KEPT"]);
    }

    #[test]
    fn test_record_stamps_session_and_user() {
        let log = store(LogStoreConfig::default(), Arc::new(SlotMap::default()));
        log.log_info(LogCategory::Feature, "FIRST", "before sign-in", None);
        log.set_user_id("user-1");
        log.log_info(LogCategory::Feature, "SECOND", "after sign-in", None);

        let entries = log.get_all();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.session_id == log.session_id()));
        assert_eq!(entries[0].user_id, None);
        assert_eq!(entries[1].user_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_production_drops_debug() {
        let config = LogStoreConfig { production: true, ..LogStoreConfig::default() };
        let log = store(config, Arc::new(SlotMap::default()));
        log.log_debug(LogCategory::Database, "DB_FILTER_EQ", "filter", None);
        log.log_info(LogCategory::Database, "DB_SELECT_START", "start", None);

        let actions: Vec<String> = log.get_all().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["DB_SELECT_START".to_string()]);
    }

    #[test]
    fn test_minimum_level_filters_record() {
        let config = LogStoreConfig { minimum_level: LogLevel::Warn, ..LogStoreConfig::default() };
        let log = store(config, Arc::new(SlotMap::default()));
        log.log_info(LogCategory::Feature, "IGNORED", "info", None);
        log.log_warning(LogCategory::Feature, "KEPT", "warn", None);
        log.log_error("boom", None, None);

        let actions: Vec<String> = log.get_all().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["KEPT".to_string(), "UNKNOWN_ERROR".to_string()]);
    }

    #[test]
    fn test_navigation_merges_details() {
        let log = store(LogStoreConfig::default(), Arc::new(SlotMap::default()));
        log.log_navigation("/today", "/plans", "click", Some(json!({ "tab": 2 })));

        let entry = &log.get_all()[0];
        assert_eq!(entry.action, "NAVIGATE");
        assert_eq!(entry.message, "Navigation from /today to /plans");
        assert_eq!(
            entry.details,
            Some(json!({ "from": "/today", "to": "/plans", "method": "click", "tab": 2 }))
        );
    }

    #[test]
    fn test_database_operation_uppercases_action() {
        let log = store(LogStoreConfig::default(), Arc::new(SlotMap::default()));
        log.log_database_operation("select", "exercises", None, Some(12));

        let entry = &log.get_all()[0];
        assert_eq!(entry.action, "DB_SELECT");
        assert_eq!(entry.message, "select operation on exercises");
        assert_eq!(entry.duration, Some(12));
    }

    #[test]
    fn test_hydration_keeps_tail() {
        let storage = Arc::new(SlotMap::default());
        {
            let log = store(LogStoreConfig::default(), storage.clone());
            for i in 0..5 {
                log.log_info(LogCategory::Feature, &format!("A{i}"), "m", None);
            }
        }

        let config = LogStoreConfig { max_logs: 3, ..LogStoreConfig::default() };
        let log = store(config, storage);
        let actions: Vec<String> = log.get_all().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec!["A2", "A3", "A4"]);
    }

    #[test]
    fn test_corrupt_slot_yields_empty_buffer() {
        let storage = Arc::new(SlotMap::default());
        storage.save(LOG_STORAGE_SLOT, "{not json").unwrap();

        let log = store(LogStoreConfig::default(), storage);
        assert!(log.is_empty());
    }

    #[test]
    fn test_export_file_name_uses_clock_date() {
        let log = store(LogStoreConfig::default(), Arc::new(SlotMap::default()));
        assert_eq!(log.export_snapshot().as_deref(), Some("gym_tracker_logs_2024-03-09.json"));
    }
}
