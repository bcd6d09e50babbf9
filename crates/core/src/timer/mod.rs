//! Workout timer domain

pub mod engine;
pub mod service;

pub use engine::{TickOutcome, TimerEngine, TimerState};
pub use service::WorkoutTimerService;
