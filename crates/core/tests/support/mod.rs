//! Shared test helpers for `gymtrack-core` integration tests.
//!
//! In-memory doubles for the storage, export and backend ports so that
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use gymtrack_common::time::MockClock;
use gymtrack_core::{EventLog, ExportSink, LogStorage, LogStoreConfig, QueryBuilder, TableBackend};
use gymtrack_domain::{
    GymTrackError, OrderOptions, QueryError, QueryResponse, Result as DomainResult,
};
use parking_lot::Mutex;
use serde_json::Value;

/// In-memory slot storage that can be told to fail writes.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStorage {
    pub fn slot(&self, name: &str) -> Option<String> {
        self.slots.lock().get(name).cloned()
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }
}

impl LogStorage for MemoryStorage {
    fn load(&self, slot: &str) -> DomainResult<Option<String>> {
        Ok(self.slot(slot))
    }

    fn save(&self, slot: &str, payload: &str) -> DomainResult<()> {
        if *self.fail_writes.lock() {
            return Err(GymTrackError::Storage("quota exceeded".into()));
        }
        self.slots.lock().insert(slot.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> DomainResult<()> {
        self.slots.lock().remove(slot);
        Ok(())
    }
}

/// Export sink that keeps every written document.
#[derive(Default)]
pub struct RecordingSink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
    fail: Mutex<bool>,
}

impl RecordingSink {
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().clone()
    }

    pub fn fail(&self, fail: bool) {
        *self.fail.lock() = fail;
    }
}

impl ExportSink for RecordingSink {
    fn write(&self, file_name: &str, contents: &[u8]) -> DomainResult<()> {
        if *self.fail.lock() {
            return Err(GymTrackError::Storage("download blocked".into()));
        }
        self.files.lock().push((file_name.to_string(), contents.to_vec()));
        Ok(())
    }
}

/// Event log wired to in-memory doubles and a mock clock.
pub struct Harness {
    pub log: Arc<EventLog>,
    pub storage: Arc<MemoryStorage>,
    pub sink: Arc<RecordingSink>,
    pub clock: MockClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(LogStoreConfig::default())
    }

    pub fn with_config(config: LogStoreConfig) -> Self {
        let storage = Arc::new(MemoryStorage::default());
        let sink = Arc::new(RecordingSink::default());
        let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap());
        let log = Arc::new(EventLog::new(
            config,
            storage.clone(),
            sink.clone(),
            Arc::new(clock.clone()),
        ));
        Self { log, storage, sink, clock }
    }

    pub fn actions(&self) -> Vec<String> {
        self.log.get_all().into_iter().map(|entry| entry.action).collect()
    }
}

/// Backend double whose queries record their clauses and resolve to a
/// scripted outcome after a simulated latency.
#[derive(Clone)]
pub struct ScriptedBackend {
    calls: Arc<Mutex<Vec<String>>>,
    outcome: Arc<Mutex<Result<QueryResponse, QueryError>>>,
    clock: MockClock,
    latency: Duration,
}

impl ScriptedBackend {
    pub fn new(clock: MockClock) -> Self {
        Self {
            calls: Arc::default(),
            outcome: Arc::new(Mutex::new(Ok(QueryResponse::ok(Value::Array(Vec::new()))))),
            clock,
            latency: Duration::from_millis(15),
        }
    }

    pub fn resolve_with(&self, outcome: Result<QueryResponse, QueryError>) {
        *self.outcome.lock() = outcome;
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn query(&self, entry: String) -> ScriptedQuery {
        self.calls.lock().push(entry);
        ScriptedQuery { backend: self.clone() }
    }
}

impl TableBackend for ScriptedBackend {
    type Query = ScriptedQuery;

    fn select(&self, table: &str, columns: &str) -> ScriptedQuery {
        self.query(format!("select {table} {columns}"))
    }

    fn insert(&self, table: &str, _rows: Value) -> ScriptedQuery {
        self.query(format!("insert {table}"))
    }

    fn update(&self, table: &str, _changes: Value) -> ScriptedQuery {
        self.query(format!("update {table}"))
    }

    fn delete(&self, table: &str) -> ScriptedQuery {
        self.query(format!("delete {table}"))
    }
}

pub struct ScriptedQuery {
    backend: ScriptedBackend,
}

impl ScriptedQuery {
    fn push(self, call: String) -> Self {
        self.backend.calls.lock().push(call);
        self
    }

    /// Builder-specific method outside the shared chain surface.
    pub fn contains(self, column: &str, value: Value) -> Self {
        self.push(format!("contains {column} {value}"))
    }
}

#[async_trait]
impl QueryBuilder for ScriptedQuery {
    fn eq(self, column: &str, value: Value) -> Self {
        self.push(format!("eq {column} {value}"))
    }

    fn neq(self, column: &str, value: Value) -> Self {
        self.push(format!("neq {column} {value}"))
    }

    fn gt(self, column: &str, value: Value) -> Self {
        self.push(format!("gt {column} {value}"))
    }

    fn gte(self, column: &str, value: Value) -> Self {
        self.push(format!("gte {column} {value}"))
    }

    fn lt(self, column: &str, value: Value) -> Self {
        self.push(format!("lt {column} {value}"))
    }

    fn lte(self, column: &str, value: Value) -> Self {
        self.push(format!("lte {column} {value}"))
    }

    fn like(self, column: &str, pattern: &str) -> Self {
        self.push(format!("like {column} {pattern}"))
    }

    fn in_list(self, column: &str, values: Vec<Value>) -> Self {
        self.push(format!("in {column} {}", values.len()))
    }

    fn order(self, column: &str, options: OrderOptions) -> Self {
        self.push(format!("order {column} {}", options.ascending))
    }

    fn limit(self, count: usize) -> Self {
        self.push(format!("limit {count}"))
    }

    fn range(self, from: usize, to: usize) -> Self {
        self.push(format!("range {from} {to}"))
    }

    fn single(self) -> Self {
        self.push("single".to_string())
    }

    fn select(self, columns: &str) -> Self {
        self.push(format!("returning {columns}"))
    }

    async fn execute(self) -> Result<QueryResponse, QueryError> {
        self.backend.clock.advance(self.backend.latency);
        self.backend.outcome.lock().clone()
    }
}
