//! Interaction tracker - current view, time in view and feature usage

use std::sync::Arc;
use std::time::Instant;

use gymtrack_domain::constants::UNKNOWN_VIEW;
use gymtrack_domain::SessionInfo;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

use crate::logging::EventLog;

struct ViewState {
    current_view: String,
    entered_at: Instant,
}

/// Interaction tracker
///
/// Remembers the current view so feature, form and error entries can be
/// attributed to it, and records how long each view was shown.
pub struct UserTracker {
    log: Arc<EventLog>,
    session_started: Instant,
    view: Mutex<ViewState>,
}

impl UserTracker {
    /// Create a tracker; the session starts now and the view is `unknown`.
    pub fn new(log: Arc<EventLog>) -> Self {
        let now = log.clock().now();
        Self {
            log,
            session_started: now,
            view: Mutex::new(ViewState { current_view: UNKNOWN_VIEW.to_string(), entered_at: now }),
        }
    }

    /// Record a navigation and the time spent in the view being left.
    ///
    /// Logs `NAVIGATE`, then `TIME_IN_VIEW_<PREVIOUS>` as a performance entry
    /// unless the previous view was still `unknown`.
    pub fn track_navigation(&self, from: &str, to: &str, method: &str) {
        let now = self.log.clock().now();
        let (previous, time_in_view) = {
            let mut view = self.view.lock();
            let previous = std::mem::replace(&mut view.current_view, to.to_string());
            let spent = millis_between(view.entered_at, now);
            view.entered_at = now;
            (previous, spent)
        };

        self.log.log_navigation(from, to, method, None);

        if previous != UNKNOWN_VIEW {
            self.log.log_performance(
                &format!("TIME_IN_VIEW_{}", previous.to_uppercase()),
                time_in_view,
                Some(json!({ "view": previous })),
            );
        }
    }

    /// Log `FEATURE_<ACTION>` as a user interaction with `feature`.
    pub fn track_feature_usage(&self, feature: &str, action: &str, details: Option<Value>) {
        let mut payload = Map::new();
        payload.insert("feature".into(), json!(feature));
        payload.insert("action".into(), json!(action));
        payload.insert("current_view".into(), json!(self.current_view()));

        self.log.log_user_interaction(
            &format!("FEATURE_{}", action.to_uppercase()),
            feature,
            Some(merge(payload, details)),
        );
    }

    /// Log `FORM_<ACTION>` as a user interaction with `form_name`.
    pub fn track_form_interaction(
        &self,
        form_name: &str,
        action: &str,
        field_name: Option<&str>,
        details: Option<Value>,
    ) {
        let mut payload = Map::new();
        payload.insert("form".into(), json!(form_name));
        payload.insert("field".into(), json!(field_name));
        payload.insert("current_view".into(), json!(self.current_view()));

        self.log.log_user_interaction(
            &format!("FORM_{}", action.to_uppercase()),
            form_name,
            Some(merge(payload, details)),
        );
    }

    /// Log an `error` entry with action `USER_INTERACTION_<context>`.
    pub fn track_error(&self, message: &str, context: &str, details: Option<Value>) {
        let mut payload = Map::new();
        payload.insert("current_view".into(), json!(self.current_view()));

        self.log.log_error(
            message,
            Some(&format!("USER_INTERACTION_{context}")),
            Some(merge(payload, details)),
        );
    }

    /// Current view and session timings.
    pub fn session_info(&self) -> SessionInfo {
        let now = self.log.clock().now();
        let view = self.view.lock();
        SessionInfo {
            session_id: self.log.session_id().to_string(),
            current_view: view.current_view.clone(),
            session_duration_ms: millis_between(self.session_started, now),
            time_in_view_ms: millis_between(view.entered_at, now),
        }
    }

    /// View most recently navigated to.
    pub fn current_view(&self) -> String {
        self.view.lock().current_view.clone()
    }
}

fn millis_between(earlier: Instant, later: Instant) -> u64 {
    u64::try_from(later.saturating_duration_since(earlier).as_millis()).unwrap_or(u64::MAX)
}

// Caller keys win over the tracker's own.
fn merge(mut payload: Map<String, Value>, extra: Option<Value>) -> Value {
    match extra {
        Some(Value::Object(extra)) => payload.extend(extra),
        Some(other) => {
            payload.insert("extra".into(), other);
        }
        None => {}
    }
    Value::Object(payload)
}
