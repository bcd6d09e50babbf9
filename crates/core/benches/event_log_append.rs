use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use gymtrack_common::time::SystemClock;
use gymtrack_core::{EventLog, ExportSink, LogStorage, LogStoreConfig};
use gymtrack_domain::{LogCategory, Result as DomainResult};
use serde_json::json;

/// Storage that accepts every write, isolating serialization cost.
struct DiscardStorage;

impl LogStorage for DiscardStorage {
    fn load(&self, _slot: &str) -> DomainResult<Option<String>> {
        Ok(None)
    }

    fn save(&self, _slot: &str, payload: &str) -> DomainResult<()> {
        black_box(payload.len());
        Ok(())
    }

    fn remove(&self, _slot: &str) -> DomainResult<()> {
        Ok(())
    }
}

struct DiscardSink;

impl ExportSink for DiscardSink {
    fn write(&self, _file_name: &str, _contents: &[u8]) -> DomainResult<()> {
        Ok(())
    }
}

fn event_log(max_logs: usize) -> EventLog {
    let config = LogStoreConfig { max_logs, production: true, ..LogStoreConfig::default() };
    EventLog::new(config, Arc::new(DiscardStorage), Arc::new(DiscardSink), Arc::new(SystemClock))
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_log_append");

    for max_logs in [100usize, 1_000] {
        group.bench_function(format!("full_buffer_{max_logs}"), |b| {
            b.iter_batched(
                || {
                    let log = event_log(max_logs);
                    for i in 0..max_logs {
                        log.log_info(LogCategory::Database, "DB_SELECT_START", "warmup", Some(json!({ "i": i })));
                    }
                    log
                },
                |log| {
                    log.log_info(
                        LogCategory::Database,
                        "DB_SELECT",
                        "select operation on exercises",
                        Some(json!({ "table": "exercises", "success": true, "password": "hunter2" })),
                    );
                    black_box(log.len())
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append);
criterion_main!(benches);
