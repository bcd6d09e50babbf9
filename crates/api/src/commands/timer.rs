//! Workout timer commands

use std::time::Instant;

use gymtrack_common::time::format_clock;
use gymtrack_domain::constants::DEFAULT_REST_SECONDS;
use gymtrack_domain::{GymTrackError, Result, TimerStatus, TimerType, TimerView};
use tracing::info;

use crate::utils::logging::{log_command_execution, outcome};
use crate::AppContext;

/// Start a timer, replacing the current one, and begin display ticks.
///
/// # Arguments
/// * `timer_type` - `exercise` counts up; `rest` and `custom` count down
/// * `duration_seconds` - Countdown length. Rest timers default to 90s;
///   custom timers require a positive value; exercise timers ignore it.
/// * `owner_id` - Optional id of the exercise or set the timer belongs to
pub async fn start_timer(
    ctx: &AppContext,
    timer_type: TimerType,
    duration_seconds: Option<u32>,
    owner_id: Option<String>,
) -> Result<TimerView> {
    let command_name = "timer::start_timer";
    let start = Instant::now();

    info!(command = command_name, %timer_type, ?duration_seconds, "Starting timer");

    let result = async {
        let duration = resolve_duration(timer_type, duration_seconds)?;
        let id = ctx.timer.start_timer(timer_type, duration, owner_id);
        ctx.start_ticker(id).await?;
        Ok::<_, GymTrackError>(ctx.timer.view())
    }
    .await;

    log_command_execution(command_name, start.elapsed(), outcome(&result));
    result
}

/// Freeze the running timer. No-op when nothing runs.
pub async fn pause_timer(ctx: &AppContext) -> Result<TimerView> {
    let command_name = "timer::pause_timer";
    let start = Instant::now();

    let paused = ctx.timer.pause_timer();
    // The tick loop notices the pause on its next tick and exits.
    let result = Ok(ctx.timer.view());

    info!(command = command_name, paused, "Pause requested");
    log_command_execution(command_name, start.elapsed(), outcome(&result));
    result
}

/// Continue a paused timer and restart display ticks.
pub async fn resume_timer(ctx: &AppContext) -> Result<TimerView> {
    let command_name = "timer::resume_timer";
    let start = Instant::now();

    let result = async {
        if ctx.timer.resume_timer() {
            restart_ticks(ctx).await?;
        }
        Ok::<_, GymTrackError>(ctx.timer.view())
    }
    .await;

    log_command_execution(command_name, start.elapsed(), outcome(&result));
    result
}

/// Pause when running, resume when paused.
pub async fn toggle_pause(ctx: &AppContext) -> Result<TimerView> {
    let command_name = "timer::toggle_pause";
    let start = Instant::now();

    let result = async {
        if ctx.timer.toggle_pause() && ctx.timer.status() == TimerStatus::Running {
            restart_ticks(ctx).await?;
        }
        Ok::<_, GymTrackError>(ctx.timer.view())
    }
    .await;

    log_command_execution(command_name, start.elapsed(), outcome(&result));
    result
}

/// Restart the current timer from its initial value, running.
pub async fn reset_timer(ctx: &AppContext) -> Result<TimerView> {
    let command_name = "timer::reset_timer";
    let start = Instant::now();

    let result = async {
        if ctx.timer.reset_timer() {
            restart_ticks(ctx).await?;
        }
        Ok::<_, GymTrackError>(ctx.timer.view())
    }
    .await;

    log_command_execution(command_name, start.elapsed(), outcome(&result));
    result
}

/// Drop the current timer and stop display ticks.
pub async fn stop_timer(ctx: &AppContext) -> Result<TimerView> {
    let command_name = "timer::stop_timer";
    let start = Instant::now();

    let result = async {
        ctx.timer.stop_timer();
        ctx.stop_ticker().await?;
        Ok::<_, GymTrackError>(ctx.timer.view())
    }
    .await;

    log_command_execution(command_name, start.elapsed(), outcome(&result));
    result
}

/// Current timer view.
pub fn get_timer_view(ctx: &AppContext) -> TimerView {
    ctx.timer.view()
}

/// Displayed value rendered as `m:ss` or `h:mm:ss`.
pub fn get_timer_display(ctx: &AppContext) -> String {
    format_clock(ctx.timer.view().displayed_value)
}

fn resolve_duration(timer_type: TimerType, requested: Option<u32>) -> Result<u32> {
    match (timer_type, requested) {
        (TimerType::Exercise, requested) => Ok(requested.unwrap_or(0)),
        (TimerType::Rest, None) => Ok(DEFAULT_REST_SECONDS),
        (TimerType::Rest | TimerType::Custom, Some(0)) | (TimerType::Custom, None) => {
            Err(GymTrackError::InvalidInput(format!(
                "{timer_type} timer needs a positive duration"
            )))
        }
        (_, Some(seconds)) => Ok(seconds),
    }
}

async fn restart_ticks(ctx: &AppContext) -> Result<()> {
    match ctx.timer.active_id() {
        Some(id) => ctx.start_ticker(id).await,
        None => Ok(()),
    }
}
