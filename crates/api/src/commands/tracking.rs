//! Interaction tracking commands

use std::time::Instant;

use gymtrack_domain::SessionInfo;
use serde_json::Value;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// Record that the UI moved from `from` to `to`.
pub fn track_navigation(ctx: &AppContext, from: &str, to: &str, method: Option<&str>) {
    let command_name = "tracking::track_navigation";
    let start = Instant::now();

    ctx.tracker.track_navigation(from, to, method.unwrap_or("programmatic"));

    log_command_execution(command_name, start.elapsed(), Ok(()));
}

/// Record a feature action in the current view.
pub fn track_feature_usage(ctx: &AppContext, feature: &str, action: &str, details: Option<Value>) {
    let command_name = "tracking::track_feature_usage";
    let start = Instant::now();

    ctx.tracker.track_feature_usage(feature, action, details);

    log_command_execution(command_name, start.elapsed(), Ok(()));
}

/// Record a form event, optionally naming the field.
pub fn track_form_interaction(
    ctx: &AppContext,
    form_name: &str,
    action: &str,
    field_name: Option<&str>,
    details: Option<Value>,
) {
    let command_name = "tracking::track_form_interaction";
    let start = Instant::now();

    ctx.tracker.track_form_interaction(form_name, action, field_name, details);

    log_command_execution(command_name, start.elapsed(), Ok(()));
}

/// Record an error raised while handling a user interaction.
pub fn track_error(ctx: &AppContext, message: &str, context: &str, details: Option<Value>) {
    let command_name = "tracking::track_error";
    let start = Instant::now();

    ctx.tracker.track_error(message, context, details);

    log_command_execution(command_name, start.elapsed(), Ok(()));
}

/// Current view and session timings.
pub fn get_session_info(ctx: &AppContext) -> SessionInfo {
    ctx.tracker.session_info()
}
