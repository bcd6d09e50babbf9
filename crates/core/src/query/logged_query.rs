//! Instrumented query builder.
//!
//! [`LoggedQuery`] wraps any [`QueryBuilder`]. Each chain call records a
//! `database`/`debug` entry and delegates; [`execute`](QueryBuilder::execute)
//! records exactly one completion entry and hands back the wrapped result
//! untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use gymtrack_common::privacy::REDACTED_MARKER;
use gymtrack_domain::{
    LogCategory, OrderOptions, QueryError, QueryOperation, QueryResponse,
};
use serde_json::{json, Map, Value};

use super::ports::QueryBuilder;
use crate::logging::EventLog;

/// Bookkeeping shared by the entry point and the terminal resolution.
#[derive(Clone)]
pub(crate) struct QueryTrace {
    pub(crate) log: Arc<EventLog>,
    pub(crate) operation: QueryOperation,
    pub(crate) table: String,
    pub(crate) started: Instant,
    pub(crate) slow_threshold: Duration,
    /// Start-time fields repeated in the completion entry.
    pub(crate) summary: Map<String, Value>,
}

impl QueryTrace {
    fn debug(&self, action: &str, message: &str, details: Value) {
        self.log.log_debug(LogCategory::Database, action, message, Some(details));
    }

    /// Filter value as it may appear in the log.
    fn loggable(&self, column: &str, value: &Value) -> Value {
        if self.log.redactor().is_sensitive(column) {
            Value::String(REDACTED_MARKER.to_string())
        } else {
            self.log.redactor().redact(value)
        }
    }

    fn elapsed_ms(&self) -> u64 {
        let elapsed = self.log.clock().now().saturating_duration_since(self.started);
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    fn finish(&self, result: &Result<QueryResponse, QueryError>) {
        let tag = self.operation.tag();
        let duration_ms = self.elapsed_ms();

        let (success, record_count, error, error_code) = match result {
            Ok(response) => (
                response.is_ok(),
                response.record_count(),
                response.error.as_ref().map(|e| e.message.clone()),
                response.error.as_ref().and_then(|e| e.code.clone()),
            ),
            Err(err) => (false, 0, Some(err.message.clone()), err.code.clone()),
        };

        let mut details = self.summary.clone();
        details.insert("operation".into(), json!(self.operation));
        details.insert("table".into(), json!(self.table));
        details.insert("success".into(), json!(success));
        details.insert("record_count".into(), json!(record_count));
        details.insert("error".into(), json!(error));
        details.insert("error_code".into(), json!(error_code));
        self.log.log_database_operation(tag, &self.table, Some(Value::Object(details)), Some(duration_ms));

        let context = format!("DATABASE_{tag}");
        match result {
            Ok(QueryResponse { error: Some(backend_error), .. }) => {
                self.log.log_error(
                    &format!("Database {tag} error: {}", backend_error.message),
                    Some(&context),
                    Some(json!({ "table": self.table, "error": backend_error })),
                );
            }
            Err(err) => {
                self.log.log_error(
                    &format!("Database {tag} failed: {}", err.message),
                    Some(&context),
                    Some(json!({
                        "table": self.table,
                        "duration": duration_ms,
                        "error": { "message": err.message, "code": err.code },
                    })),
                );
            }
            Ok(_) => {}
        }

        let threshold_ms = u64::try_from(self.slow_threshold.as_millis()).unwrap_or(u64::MAX);
        if duration_ms > threshold_ms {
            self.log.log_warning(
                LogCategory::Performance,
                "SLOW_QUERY",
                &format!("Slow {tag} on {}: {duration_ms}ms", self.table),
                Some(json!({
                    "operation": self.operation,
                    "table": self.table,
                    "duration_ms": duration_ms,
                    "threshold_ms": threshold_ms,
                })),
            );
        }
    }
}

/// Query builder decorated with event logging.
pub struct LoggedQuery<Q> {
    inner: Q,
    trace: QueryTrace,
}

impl<Q: QueryBuilder> LoggedQuery<Q> {
    pub(crate) fn new(inner: Q, trace: QueryTrace) -> Self {
        Self { inner, trace }
    }

    /// Operation this query was opened with.
    pub fn operation(&self) -> QueryOperation {
        self.trace.operation
    }

    /// Target table.
    pub fn table(&self) -> &str {
        &self.trace.table
    }

    /// Apply a builder method outside the [`QueryBuilder`] surface.
    ///
    /// The call is logged as `DB_PASSTHROUGH` under `label`.
    #[must_use]
    pub fn passthrough(self, label: &str, apply: impl FnOnce(Q) -> Q) -> Self {
        self.trace.debug(
            "DB_PASSTHROUGH",
            &format!("Passing through: {label}"),
            json!({ "table": self.trace.table, "method": label }),
        );
        self.map(apply)
    }

    fn map(self, apply: impl FnOnce(Q) -> Q) -> Self {
        Self { inner: apply(self.inner), trace: self.trace }
    }

    fn comparison(
        self,
        action: &str,
        symbol: &str,
        operator: &str,
        column: &str,
        value: Value,
        apply: impl FnOnce(Q, &str, Value) -> Q,
    ) -> Self {
        let shown = self.trace.loggable(column, &value);
        self.trace.debug(
            action,
            &format!("Adding filter: {column} {symbol} {shown}"),
            json!({
                "table": self.trace.table,
                "column": column,
                "value": shown,
                "operator": operator,
            }),
        );
        self.map(|inner| apply(inner, column, value))
    }
}

#[async_trait]
impl<Q: QueryBuilder> QueryBuilder for LoggedQuery<Q> {
    fn eq(self, column: &str, value: Value) -> Self {
        self.comparison("DB_FILTER_EQ", "=", "eq", column, value, Q::eq)
    }

    fn neq(self, column: &str, value: Value) -> Self {
        self.comparison("DB_FILTER_NEQ", "!=", "neq", column, value, Q::neq)
    }

    fn gt(self, column: &str, value: Value) -> Self {
        self.comparison("DB_FILTER_GT", ">", "gt", column, value, Q::gt)
    }

    fn gte(self, column: &str, value: Value) -> Self {
        self.comparison("DB_FILTER_GTE", ">=", "gte", column, value, Q::gte)
    }

    fn lt(self, column: &str, value: Value) -> Self {
        self.comparison("DB_FILTER_LT", "<", "lt", column, value, Q::lt)
    }

    fn lte(self, column: &str, value: Value) -> Self {
        self.comparison("DB_FILTER_LTE", "<=", "lte", column, value, Q::lte)
    }

    fn like(self, column: &str, pattern: &str) -> Self {
        let shown = self.trace.loggable(column, &Value::String(pattern.to_string()));
        let shown_text = shown.as_str().map_or_else(|| shown.to_string(), str::to_string);
        self.trace.debug(
            "DB_FILTER_LIKE",
            &format!("Adding filter: {column} LIKE {shown_text}"),
            json!({
                "table": self.trace.table,
                "column": column,
                "pattern": shown,
                "operator": "like",
            }),
        );
        self.map(|inner| inner.like(column, pattern))
    }

    fn in_list(self, column: &str, values: Vec<Value>) -> Self {
        self.trace.debug(
            "DB_FILTER_IN",
            &format!("Adding filter: {column} IN (...)"),
            json!({
                "table": self.trace.table,
                "column": column,
                "value_count": values.len(),
                "operator": "in",
            }),
        );
        self.map(|inner| inner.in_list(column, values))
    }

    fn order(self, column: &str, options: OrderOptions) -> Self {
        self.trace.debug(
            "DB_ORDER",
            &format!("Adding order: {column}"),
            json!({
                "table": self.trace.table,
                "column": column,
                "ascending": options.ascending,
            }),
        );
        self.map(|inner| inner.order(column, options))
    }

    fn limit(self, count: usize) -> Self {
        self.trace.debug(
            "DB_LIMIT",
            &format!("Adding limit: {count}"),
            json!({ "table": self.trace.table, "limit": count }),
        );
        self.map(|inner| inner.limit(count))
    }

    fn range(self, from: usize, to: usize) -> Self {
        self.trace.debug(
            "DB_RANGE",
            &format!("Adding range: {from}-{to}"),
            json!({ "table": self.trace.table, "from": from, "to": to }),
        );
        self.map(|inner| inner.range(from, to))
    }

    fn single(self) -> Self {
        self.trace.debug(
            "DB_SINGLE",
            "Expecting single result",
            json!({ "table": self.trace.table }),
        );
        self.map(Q::single)
    }

    fn select(self, columns: &str) -> Self {
        self.trace.debug(
            "DB_RETURNING",
            &format!("{} with SELECT: {columns}", self.trace.operation.tag()),
            json!({ "table": self.trace.table, "columns": columns }),
        );
        self.map(|inner| inner.select(columns))
    }

    async fn execute(self) -> Result<QueryResponse, QueryError> {
        let Self { inner, trace } = self;
        let result = inner.execute().await;
        trace.finish(&result);
        result
    }
}
