//! Workout timer types shared by the engine and its callers.

use std::fmt;

use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

use crate::impl_domain_enum_conversions;

/// Kind of workout timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum TimerType {
    /// Counts up from zero while a set is performed.
    Exercise,
    /// Counts down a rest period.
    Rest,
    /// User-defined countdown.
    Custom,
}

impl_domain_enum_conversions!(TimerType {
    Exercise => "exercise",
    Rest => "rest",
    Custom => "custom",
});

impl TimerType {
    /// Countdown timers display remaining time and complete at zero.
    pub const fn is_countdown(self) -> bool {
        matches!(self, Self::Rest | Self::Custom)
    }
}

/// Lifecycle state of the timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    /// Reported once when a countdown reaches zero.
    Completed,
}

impl_domain_enum_conversions!(TimerStatus {
    Idle => "idle",
    Running => "running",
    Paused => "paused",
    Completed => "completed",
});

/// Identity of one timer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export, type = "string"))]
#[serde(transparent)]
pub struct TimerId(Uuid);

impl TimerId {
    /// Fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer_{}", self.0.simple())
    }
}

/// Read model consumed by timer displays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TimerView {
    pub timer_id: Option<TimerId>,
    pub timer_type: Option<TimerType>,
    /// Whole seconds: remaining for countdowns, elapsed for count-up.
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub displayed_value: u64,
    /// Whether ticks are currently advancing the displayed value.
    pub is_active: bool,
    pub status: TimerStatus,
    /// Configured length in seconds.
    pub duration_seconds: Option<u32>,
    /// Workout exercise the timer belongs to.
    pub owner_id: Option<String>,
}

impl TimerView {
    /// View of an engine with no timer.
    pub fn idle() -> Self {
        Self::default()
    }
}
