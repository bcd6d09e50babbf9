//! Drift-resistant workout timer.
//!
//! The displayed value is always derived from clock deltas:
//! `elapsed = accumulated + (now - started_at)` while running, so late or
//! missed ticks never skew it. Ticks carry the [`TimerId`] they were
//! scheduled for and are ignored once that timer is gone or not running.

use std::sync::Arc;
use std::time::Instant;

use gymtrack_common::time::Clock;
use gymtrack_domain::{TimerId, TimerStatus, TimerType, TimerView};

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to a stopped, replaced or paused timer.
    Stale,
    /// New displayed value in whole seconds.
    Updated(u64),
    /// A countdown reached zero; the engine is idle again.
    Completed,
}

/// State of the live timer.
#[derive(Debug, Clone)]
pub struct TimerState {
    pub id: TimerId,
    pub timer_type: TimerType,
    pub duration_seconds: u32,
    pub owner_id: Option<String>,
    /// Start of the current running stretch; moved forward on resume.
    pub started_at: Instant,
    /// Milliseconds carried over from earlier running stretches.
    pub accumulated_ms: u64,
    pub paused_at: Option<Instant>,
    pub is_active: bool,
}

impl TimerState {
    fn elapsed_ms(&self, now: Instant) -> u64 {
        let current = if self.is_active {
            u64::try_from(now.saturating_duration_since(self.started_at).as_millis())
                .unwrap_or(u64::MAX)
        } else {
            0
        };
        self.accumulated_ms.saturating_add(current)
    }

    fn initial_display(&self) -> u64 {
        if self.timer_type.is_countdown() {
            u64::from(self.duration_seconds)
        } else {
            0
        }
    }

    fn display_for(&self, elapsed_ms: u64) -> u64 {
        let elapsed_s = elapsed_ms / 1000;
        if self.timer_type.is_countdown() {
            u64::from(self.duration_seconds).saturating_sub(elapsed_s)
        } else {
            elapsed_s
        }
    }
}

/// Single-instance timer state machine.
pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    state: Option<TimerState>,
    displayed: u64,
}

impl TimerEngine {
    /// Idle engine reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, state: None, displayed: 0 }
    }

    /// Start a new timer, discarding any current one.
    pub fn start(
        &mut self,
        timer_type: TimerType,
        duration_seconds: u32,
        owner_id: Option<String>,
    ) -> TimerId {
        self.stop();

        let state = TimerState {
            id: TimerId::new(),
            timer_type,
            duration_seconds,
            owner_id,
            started_at: self.clock.now(),
            accumulated_ms: 0,
            paused_at: None,
            is_active: true,
        };
        let id = state.id;
        self.displayed = state.initial_display();
        self.state = Some(state);
        id
    }

    /// Recompute the displayed value for the timer `id` was scheduled for.
    pub fn tick(&mut self, id: TimerId) -> TickOutcome {
        let now = self.clock.now();
        let Some(state) = self.state.as_ref().filter(|s| s.id == id && s.is_active) else {
            return TickOutcome::Stale;
        };

        let displayed = state.display_for(state.elapsed_ms(now));
        if state.timer_type.is_countdown() && displayed == 0 {
            self.state = None;
            self.displayed = 0;
            return TickOutcome::Completed;
        }

        self.displayed = displayed;
        TickOutcome::Updated(displayed)
    }

    /// Freeze a running timer. Returns `false` when nothing is running.
    pub fn pause(&mut self) -> bool {
        let now = self.clock.now();
        let Some(state) = self.state.as_mut().filter(|s| s.is_active) else {
            return false;
        };

        state.accumulated_ms = state.elapsed_ms(now);
        state.is_active = false;
        state.paused_at = Some(now);
        self.displayed = state.display_for(state.accumulated_ms);
        true
    }

    /// Continue a paused timer. Returns `false` unless paused.
    pub fn resume(&mut self) -> bool {
        let now = self.clock.now();
        let Some(state) = self.state.as_mut().filter(|s| !s.is_active) else {
            return false;
        };

        state.started_at = now;
        state.paused_at = None;
        state.is_active = true;
        true
    }

    /// Restart the current timer from its initial value, running.
    pub fn reset(&mut self) -> bool {
        let now = self.clock.now();
        let Some(state) = self.state.as_mut() else {
            return false;
        };

        state.started_at = now;
        state.accumulated_ms = 0;
        state.paused_at = None;
        state.is_active = true;
        self.displayed = state.initial_display();
        true
    }

    /// Drop the current timer. Returns whether one existed.
    pub fn stop(&mut self) -> bool {
        self.displayed = 0;
        self.state.take().is_some()
    }

    /// Idle, running or paused.
    pub fn status(&self) -> TimerStatus {
        match &self.state {
            None => TimerStatus::Idle,
            Some(state) if state.is_active => TimerStatus::Running,
            Some(_) => TimerStatus::Paused,
        }
    }

    /// Id of the live timer, if any.
    pub fn active_id(&self) -> Option<TimerId> {
        self.state.as_ref().map(|s| s.id)
    }

    /// Live timer state, if any.
    pub fn state(&self) -> Option<&TimerState> {
        self.state.as_ref()
    }

    /// Seconds last shown, as of the most recent tick.
    pub fn displayed_value(&self) -> u64 {
        self.displayed
    }

    /// Snapshot for display.
    pub fn view(&self) -> TimerView {
        match &self.state {
            None => TimerView::idle(),
            Some(state) => TimerView {
                timer_id: Some(state.id),
                timer_type: Some(state.timer_type),
                displayed_value: self.displayed,
                is_active: state.is_active,
                status: self.status(),
                duration_seconds: Some(state.duration_seconds),
                owner_id: state.owner_id.clone(),
            },
        }
    }
}
