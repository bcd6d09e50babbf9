//! In-memory table backend.
//!
//! Stores rows as JSON objects per table and evaluates the builder chain
//! locally. Used for offline runs and as the default backend when no hosted
//! backend is configured. Error codes mirror the hosted backend's so the
//! instrumentation sees the same shapes either way.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use gymtrack_core::{QueryBuilder, TableBackend};
use gymtrack_domain::{BackendError, OrderOptions, QueryError, QueryResponse};
use parking_lot::Mutex;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::trace;
use uuid::Uuid;

/// Relation does not exist.
pub const CODE_UNDEFINED_TABLE: &str = "42P01";
/// `single()` matched zero or several rows.
pub const CODE_NOT_SINGLE_ROW: &str = "PGRST116";
/// Payload or filter argument rejected.
pub const CODE_INVALID_PARAMETER: &str = "22023";

type Tables = Arc<Mutex<HashMap<String, Vec<Map<String, Value>>>>>;

/// Backend holding every table in process memory.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    tables: Tables,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or empty) a table so selects against it succeed.
    pub fn create_table(&self, table: &str) {
        self.tables.lock().insert(table.to_string(), Vec::new());
    }

    /// Replace a table's rows. Non-object values are skipped.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.tables.lock().insert(table.to_string(), rows);
    }

    /// Snapshot of a table's rows, `None` when the table does not exist.
    pub fn rows(&self, table: &str) -> Option<Vec<Value>> {
        self.tables
            .lock()
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
    }

    fn query(&self, table: &str, kind: Kind) -> MemoryQuery {
        MemoryQuery {
            tables: Arc::clone(&self.tables),
            table: table.to_string(),
            kind,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            range: None,
            single: false,
            returning: None,
            invalid: None,
        }
    }
}

impl TableBackend for InMemoryBackend {
    type Query = MemoryQuery;

    fn select(&self, table: &str, columns: &str) -> MemoryQuery {
        self.query(table, Kind::Select { columns: columns.to_string() })
    }

    fn insert(&self, table: &str, rows: Value) -> MemoryQuery {
        self.query(table, Kind::Insert(rows))
    }

    fn update(&self, table: &str, changes: Value) -> MemoryQuery {
        self.query(table, Kind::Update(changes))
    }

    fn delete(&self, table: &str) -> MemoryQuery {
        self.query(table, Kind::Delete)
    }
}

#[derive(Debug, Clone)]
enum Kind {
    Select { columns: String },
    Insert(Value),
    Update(Value),
    Delete,
}

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone)]
enum Filter {
    Compare { column: String, op: Comparison, value: Value },
    Like { column: String, pattern: Regex },
    In { column: String, values: Vec<Value> },
}

impl Filter {
    fn matches(&self, row: &Map<String, Value>) -> bool {
        match self {
            Filter::Compare { column, op, value } => {
                // Absent columns compare as SQL NULL: no comparison matches.
                let Some(actual) = row.get(column).filter(|v| !v.is_null()) else {
                    return false;
                };
                match op {
                    Comparison::Eq => actual == value,
                    Comparison::Neq => actual != value,
                    Comparison::Gt => compare(actual, value) == Some(Ordering::Greater),
                    Comparison::Gte => {
                        matches!(compare(actual, value), Some(Ordering::Greater | Ordering::Equal))
                    }
                    Comparison::Lt => compare(actual, value) == Some(Ordering::Less),
                    Comparison::Lte => {
                        matches!(compare(actual, value), Some(Ordering::Less | Ordering::Equal))
                    }
                }
            }
            Filter::Like { column, pattern } => {
                row.get(column).and_then(Value::as_str).is_some_and(|text| pattern.is_match(text))
            }
            Filter::In { column, values } => {
                row.get(column).is_some_and(|actual| values.contains(actual))
            }
        }
    }
}

/// Ordering between two JSON scalars of the same kind.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Translate a SQL `LIKE` pattern into an anchored regex.
fn like_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");
    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '%' => source.push_str(".*"),
            '_' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }
    source.push('$');
    Regex::new(&source)
}

fn project(row: &Map<String, Value>, columns: &str) -> Value {
    let columns = columns.trim();
    if columns.is_empty() || columns == "*" {
        return Value::Object(row.clone());
    }
    let projected = columns
        .split(',')
        .map(str::trim)
        .filter_map(|column| row.get(column).map(|value| (column.to_string(), value.clone())))
        .collect();
    Value::Object(projected)
}

fn sort_rows(rows: &mut [Map<String, Value>], order: &[(String, OrderOptions)]) {
    if order.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for (column, options) in order {
            let left = a.get(column).filter(|v| !v.is_null());
            let right = b.get(column).filter(|v| !v.is_null());
            let nulls_first = options.nulls_first.unwrap_or(!options.ascending);
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) if nulls_first => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) if nulls_first => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(l), Some(r)) => {
                    let ordering = compare(l, r).unwrap_or(Ordering::Equal);
                    if options.ascending {
                        ordering
                    } else {
                        ordering.reverse()
                    }
                }
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Builder evaluated against [`InMemoryBackend`] tables.
#[derive(Debug)]
pub struct MemoryQuery {
    tables: Tables,
    table: String,
    kind: Kind,
    filters: Vec<Filter>,
    order: Vec<(String, OrderOptions)>,
    limit: Option<usize>,
    range: Option<(usize, usize)>,
    single: bool,
    returning: Option<String>,
    invalid: Option<BackendError>,
}

impl MemoryQuery {
    fn compare(mut self, column: &str, op: Comparison, value: Value) -> Self {
        self.filters.push(Filter::Compare { column: column.to_string(), op, value });
        self
    }

    fn matching(&self, row: &Map<String, Value>) -> bool {
        self.filters.iter().all(|filter| filter.matches(row))
    }

    /// Apply order, range, limit, projection and `single` to result rows.
    fn shape(&self, mut rows: Vec<Map<String, Value>>, columns: &str) -> QueryResponse {
        sort_rows(&mut rows, &self.order);

        let mut rows: Vec<_> = match self.range {
            Some((from, to)) if to >= from => {
                rows.into_iter().skip(from).take((to - from).saturating_add(1)).collect()
            },
            Some(_) => Vec::new(),
            None => rows,
        };
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        let projected: Vec<Value> = rows.iter().map(|row| project(row, columns)).collect();
        if self.single {
            return match <[Value; 1]>::try_from(projected) {
                Ok([row]) => QueryResponse::ok(row),
                Err(rows) => QueryResponse::failed(BackendError::new(
                    format!(
                        "JSON object requested, multiple (or no) rows returned ({} rows)",
                        rows.len()
                    ),
                    CODE_NOT_SINGLE_ROW,
                )),
            };
        }
        QueryResponse::ok(Value::Array(projected))
    }

    /// Mutation result: affected rows when `select()` was chained, else null.
    fn returning(&self, rows: Vec<Map<String, Value>>) -> QueryResponse {
        match self.returning.as_deref() {
            Some(columns) => self.shape(rows, columns),
            None => QueryResponse::ok(Value::Null),
        }
    }

    fn run(self, tables: &mut HashMap<String, Vec<Map<String, Value>>>) -> QueryResponse {
        if let Some(error) = self.invalid.clone() {
            return QueryResponse::failed(error);
        }

        match &self.kind {
            Kind::Select { columns } => {
                let Some(rows) = tables.get(&self.table) else {
                    return undefined_table(&self.table);
                };
                let matched = rows.iter().filter(|row| self.matching(row)).cloned().collect();
                self.shape(matched, columns)
            }
            Kind::Insert(payload) => {
                let incoming = match payload {
                    Value::Object(map) => vec![map.clone()],
                    Value::Array(items) => {
                        let mut maps = Vec::with_capacity(items.len());
                        for item in items {
                            match item {
                                Value::Object(map) => maps.push(map.clone()),
                                _ => return invalid_payload("insert rows must be objects"),
                            }
                        }
                        maps
                    }
                    _ => return invalid_payload("insert expects an object or an array of objects"),
                };

                let inserted: Vec<_> = incoming
                    .into_iter()
                    .map(|mut row| {
                        row.entry("id")
                            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
                        row
                    })
                    .collect();
                tables.entry(self.table.clone()).or_default().extend(inserted.iter().cloned());
                self.returning(inserted)
            }
            Kind::Update(changes) => {
                let Value::Object(changes) = changes else {
                    return invalid_payload("update expects an object");
                };
                let Some(rows) = tables.get_mut(&self.table) else {
                    return undefined_table(&self.table);
                };
                let mut updated = Vec::new();
                for row in rows.iter_mut().filter(|row| self.matching(row)) {
                    for (key, value) in changes {
                        row.insert(key.clone(), value.clone());
                    }
                    updated.push(row.clone());
                }
                self.returning(updated)
            }
            Kind::Delete => {
                let Some(rows) = tables.get_mut(&self.table) else {
                    return undefined_table(&self.table);
                };
                let (removed, kept): (Vec<_>, Vec<_>) =
                    std::mem::take(rows).into_iter().partition(|row| self.matching(row));
                *rows = kept;
                self.returning(removed)
            }
        }
    }
}

fn undefined_table(table: &str) -> QueryResponse {
    QueryResponse::failed(BackendError::new(
        format!("relation \"{table}\" does not exist"),
        CODE_UNDEFINED_TABLE,
    ))
}

fn invalid_payload(message: &str) -> QueryResponse {
    QueryResponse::failed(BackendError::new(message, CODE_INVALID_PARAMETER))
}

#[async_trait]
impl QueryBuilder for MemoryQuery {
    fn eq(self, column: &str, value: Value) -> Self {
        self.compare(column, Comparison::Eq, value)
    }

    fn neq(self, column: &str, value: Value) -> Self {
        self.compare(column, Comparison::Neq, value)
    }

    fn gt(self, column: &str, value: Value) -> Self {
        self.compare(column, Comparison::Gt, value)
    }

    fn gte(self, column: &str, value: Value) -> Self {
        self.compare(column, Comparison::Gte, value)
    }

    fn lt(self, column: &str, value: Value) -> Self {
        self.compare(column, Comparison::Lt, value)
    }

    fn lte(self, column: &str, value: Value) -> Self {
        self.compare(column, Comparison::Lte, value)
    }

    fn like(mut self, column: &str, pattern: &str) -> Self {
        match like_to_regex(pattern) {
            Ok(pattern) => self.filters.push(Filter::Like { column: column.to_string(), pattern }),
            Err(err) => {
                self.invalid = Some(BackendError::new(
                    format!("invalid LIKE pattern {pattern:?}: {err}"),
                    CODE_INVALID_PARAMETER,
                ));
            }
        }
        self
    }

    fn in_list(mut self, column: &str, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In { column: column.to_string(), values });
        self
    }

    fn order(mut self, column: &str, options: OrderOptions) -> Self {
        self.order.push((column.to_string(), options));
        self
    }

    fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    fn range(mut self, from: usize, to: usize) -> Self {
        self.range = Some((from, to));
        self
    }

    fn single(mut self) -> Self {
        self.single = true;
        self
    }

    fn select(mut self, columns: &str) -> Self {
        self.returning = Some(columns.to_string());
        self
    }

    async fn execute(self) -> Result<QueryResponse, QueryError> {
        let tables = Arc::clone(&self.tables);
        let table = self.table.clone();
        let response = {
            let mut guard = tables.lock();
            self.run(&mut guard)
        };
        trace!(table = %table, ok = response.is_ok(), rows = response.record_count(), "memory query executed");
        Ok(response)
    }
}
