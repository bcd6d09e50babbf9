//! Timer control surface used by the UI and the tick driver.

use std::sync::Arc;

use gymtrack_common::time::Clock;
use gymtrack_domain::{LogCategory, TimerId, TimerStatus, TimerType, TimerView};
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::engine::{TickOutcome, TimerEngine};
use crate::logging::EventLog;

/// Workout timer service: serializes engine access and logs transitions as
/// `feature` entries.
pub struct WorkoutTimerService {
    engine: Mutex<TimerEngine>,
    log: Arc<EventLog>,
}

impl WorkoutTimerService {
    pub fn new(clock: Arc<dyn Clock>, log: Arc<EventLog>) -> Self {
        Self { engine: Mutex::new(TimerEngine::new(clock)), log }
    }

    /// Start a timer, replacing the current one. Returns the new timer's id,
    /// which ticks must carry.
    pub fn start_timer(
        &self,
        timer_type: TimerType,
        duration_seconds: u32,
        owner_id: Option<String>,
    ) -> TimerId {
        let (replaced, id) = {
            let mut engine = self.engine.lock();
            let replaced = engine.active_id();
            let id = engine.start(timer_type, duration_seconds, owner_id.clone());
            (replaced, id)
        };

        if let Some(previous) = replaced {
            self.feature("TIMER_STOPPED", "Timer replaced by a new timer", json!({
                "timer_id": previous.to_string(),
                "replaced_by": id.to_string(),
            }));
        }

        tracing::info!(timer_id = %id, timer_type = %timer_type, duration_seconds, "Timer started");
        self.feature(
            "TIMER_STARTED",
            &format!("Started {timer_type} timer"),
            json!({
                "timer_id": id.to_string(),
                "timer_type": timer_type,
                "duration_seconds": duration_seconds,
                "owner_id": owner_id,
            }),
        );
        id
    }

    pub fn pause_timer(&self) -> bool {
        let view = {
            let mut engine = self.engine.lock();
            if !engine.pause() {
                return false;
            }
            engine.view()
        };

        self.feature("TIMER_PAUSED", "Timer paused", view_details(&view));
        true
    }

    pub fn resume_timer(&self) -> bool {
        let view = {
            let mut engine = self.engine.lock();
            if !engine.resume() {
                return false;
            }
            engine.view()
        };

        self.feature("TIMER_RESUMED", "Timer resumed", view_details(&view));
        true
    }

    /// Pause when running, resume when paused.
    pub fn toggle_pause(&self) -> bool {
        match self.status() {
            TimerStatus::Running => self.pause_timer(),
            TimerStatus::Paused => self.resume_timer(),
            TimerStatus::Idle | TimerStatus::Completed => false,
        }
    }

    pub fn reset_timer(&self) -> bool {
        let view = {
            let mut engine = self.engine.lock();
            if !engine.reset() {
                return false;
            }
            engine.view()
        };

        self.feature("TIMER_RESET", "Timer reset", view_details(&view));
        true
    }

    pub fn stop_timer(&self) -> bool {
        let view = {
            let mut engine = self.engine.lock();
            let view = engine.view();
            if !engine.stop() {
                return false;
            }
            view
        };

        self.feature("TIMER_STOPPED", "Timer stopped", view_details(&view));
        true
    }

    /// Deliver a tick scheduled for `id`.
    pub fn tick(&self, id: TimerId) -> TickOutcome {
        let (before, outcome) = {
            let mut engine = self.engine.lock();
            let before = engine.view();
            (before, engine.tick(id))
        };

        if outcome == TickOutcome::Completed {
            tracing::info!(timer_id = %id, "Timer completed");
            self.feature("TIMER_COMPLETED", "Countdown finished", view_details(&before));
        }
        outcome
    }

    pub fn view(&self) -> TimerView {
        self.engine.lock().view()
    }

    pub fn status(&self) -> TimerStatus {
        self.engine.lock().status()
    }

    pub fn active_id(&self) -> Option<TimerId> {
        self.engine.lock().active_id()
    }

    fn feature(&self, action: &str, message: &str, details: Value) {
        self.log.log_info(LogCategory::Feature, action, message, Some(details));
    }
}

fn view_details(view: &TimerView) -> Value {
    json!({
        "timer_id": view.timer_id.map(|id| id.to_string()),
        "timer_type": view.timer_type,
        "displayed_value": view.displayed_value,
        "duration_seconds": view.duration_seconds,
        "owner_id": view.owner_id,
    })
}
