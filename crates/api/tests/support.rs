//! Shared helpers for `gymtrack-app` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use gymtrack_app::AppContext;
use gymtrack_common::time::MockClock;
use gymtrack_domain::{Config, LoggingConfig, TimerConfig};
use tempfile::TempDir;

/// Context wired to temporary directories and a manually driven clock.
pub struct TestContext {
    pub ctx: AppContext,
    pub clock: MockClock,
    /// Keep temporary directories alive for the lifetime of the context.
    pub temp_dir: TempDir,
}

/// Config pointing storage and export at `temp_dir`, with fast ticks.
pub fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        logging: LoggingConfig {
            storage_dir: temp_dir.path().join("logs").to_string_lossy().into_owned(),
            export_dir: temp_dir.path().join("exports").to_string_lossy().into_owned(),
            ..LoggingConfig::default()
        },
        timer: TimerConfig { tick_interval_ms: 5 },
        ..Config::default()
    }
}

/// Fresh context whose wall clock starts at 2024-05-01 07:30 UTC.
pub fn setup_test_context() -> TestContext {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap());
    let ctx = AppContext::new_with_clock(test_config(&temp_dir), Arc::new(clock.clone()))
        .expect("AppContext creation should succeed");

    TestContext { ctx, clock, temp_dir }
}

/// Actions recorded in the event log, oldest first.
pub fn actions(ctx: &AppContext) -> Vec<String> {
    ctx.event_log.get_all().into_iter().map(|e| e.action).collect()
}
