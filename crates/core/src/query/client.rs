//! Logged entry points of the backend table API.

use std::sync::Arc;
use std::time::Duration;

use gymtrack_domain::constants::{DEFAULT_SELECT_COLUMNS, DEFAULT_SLOW_QUERY_THRESHOLD_MS};
use gymtrack_domain::{LogCategory, QueryOperation};
use serde_json::{json, Map, Value};

use super::logged_query::{LoggedQuery, QueryTrace};
use super::ports::TableBackend;
use crate::logging::EventLog;

/// Backend client whose queries write to the event log.
pub struct LoggedClient<B> {
    backend: B,
    log: Arc<EventLog>,
    slow_threshold: Duration,
}

impl<B: TableBackend> LoggedClient<B> {
    /// Wrap `backend`, logging through `log` with the default slow-query threshold.
    pub fn new(backend: B, log: Arc<EventLog>) -> Self {
        Self {
            backend,
            log,
            slow_threshold: Duration::from_millis(DEFAULT_SLOW_QUERY_THRESHOLD_MS),
        }
    }

    /// Queries slower than `threshold` also record a `SLOW_QUERY` warning.
    #[must_use]
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    /// Open a table for querying.
    pub fn from(&self, table: &str) -> LoggedTable<'_, B> {
        LoggedTable { client: self, table: table.to_string() }
    }

    /// Unwrapped backend, for calls that must not be logged.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Log every query is recorded to.
    pub fn event_log(&self) -> &Arc<EventLog> {
        &self.log
    }

    /// Record an auth state change and keep the log's user id in step.
    ///
    /// `SIGNED_IN` with a user id sets it, `SIGNED_OUT` clears it.
    pub fn on_auth_state_change(&self, event: &str, user_id: Option<&str>) {
        let event = event.to_uppercase();
        self.log.log_info(
            LogCategory::Auth,
            &format!("AUTH_{event}"),
            &format!("Authentication event: {event}"),
            Some(json!({
                "event": event,
                "user_id": user_id,
                "session": if user_id.is_some() { "authenticated" } else { "anonymous" },
            })),
        );

        match (event.as_str(), user_id) {
            ("SIGNED_IN", Some(id)) => self.log.set_user_id(id),
            ("SIGNED_OUT", _) => self.log.clear_user_id(),
            _ => {}
        }
    }

    fn open(
        &self,
        operation: QueryOperation,
        table: &str,
        start_details: Map<String, Value>,
        summary: Map<String, Value>,
    ) -> QueryTrace {
        let tag = operation.tag();
        let mut details = start_details;
        details.insert("table".into(), json!(table));
        self.log.log_info(
            LogCategory::Database,
            &format!("DB_{tag}_START"),
            &format!("Starting {tag} on {table}"),
            Some(Value::Object(details)),
        );

        QueryTrace {
            log: Arc::clone(&self.log),
            operation,
            table: table.to_string(),
            started: self.log.clock().now(),
            slow_threshold: self.slow_threshold,
            summary,
        }
    }
}

fn payload_count(payload: &Value) -> usize {
    match payload {
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

/// Table handle returned by [`LoggedClient::from`].
pub struct LoggedTable<'a, B> {
    client: &'a LoggedClient<B>,
    table: String,
}

impl<B: TableBackend> LoggedTable<'_, B> {
    /// `SELECT columns`; pass `"*"` for every column.
    pub fn select(&self, columns: &str) -> LoggedQuery<B::Query> {
        let mut summary = Map::new();
        summary.insert("columns".into(), json!(columns));
        let trace = self.client.open(QueryOperation::Select, &self.table, summary.clone(), summary);
        LoggedQuery::new(self.client.backend.select(&self.table, columns), trace)
    }

    /// `SELECT *`
    pub fn select_all(&self) -> LoggedQuery<B::Query> {
        self.select(DEFAULT_SELECT_COLUMNS)
    }

    /// Insert one object or an array of objects.
    pub fn insert(&self, rows: Value) -> LoggedQuery<B::Query> {
        let trace = self.open_mutation(QueryOperation::Insert, &rows);
        LoggedQuery::new(self.client.backend.insert(&self.table, rows), trace)
    }

    /// Update matching rows with `changes`.
    pub fn update(&self, changes: Value) -> LoggedQuery<B::Query> {
        let trace = self.open_mutation(QueryOperation::Update, &changes);
        LoggedQuery::new(self.client.backend.update(&self.table, changes), trace)
    }

    /// Delete matching rows.
    pub fn delete(&self) -> LoggedQuery<B::Query> {
        let trace = self.client.open(QueryOperation::Delete, &self.table, Map::new(), Map::new());
        LoggedQuery::new(self.client.backend.delete(&self.table), trace)
    }

    fn open_mutation(&self, operation: QueryOperation, payload: &Value) -> QueryTrace {
        let count = payload_count(payload);

        let mut start = Map::new();
        start.insert("record_count".into(), json!(count));
        start.insert("data_preview".into(), self.client.log.redactor().redact(payload));

        let mut summary = Map::new();
        summary.insert("requested_count".into(), json!(count));

        self.client.open(operation, &self.table, start, summary)
    }
}
