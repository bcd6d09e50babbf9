//! Recursive redaction of sensitive keys in structured payloads
//!
//! Log payloads are arbitrary JSON trees. Before a payload is attached to a
//! log entry every object key is checked against a list of sensitive name
//! fragments (case-insensitive substring match); matching values are replaced
//! by a fixed marker regardless of their shape. Arrays and nested objects are
//! walked recursively.
//!
//! The walk is bounded by [`Redactor::max_depth`]. Subtrees below that depth
//! are replaced by [`DEPTH_LIMIT_MARKER`] rather than copied, so a pathological
//! payload cannot exhaust the stack.

use serde_json::{Map, Value};

/// Marker written in place of a sensitive value.
pub const REDACTED_MARKER: &str = "[REDACTED]";

/// Marker written in place of a subtree nested deeper than the limit.
pub const DEPTH_LIMIT_MARKER: &str = "[MAX_DEPTH_EXCEEDED]";

/// Key fragments treated as sensitive by default.
pub const DEFAULT_SENSITIVE_FRAGMENTS: &[&str] = &["password", "token", "secret", "key", "auth"];

/// Default nesting limit for the redaction walk.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Configurable key-based redactor.
#[derive(Debug, Clone)]
pub struct Redactor {
    fragments: Vec<String>,
    marker: String,
    max_depth: usize,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_FRAGMENTS.iter().copied())
    }
}

impl Redactor {
    /// Build a redactor for the given key fragments.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: fragments.into_iter().map(|f| f.as_ref().to_lowercase()).collect(),
            marker: REDACTED_MARKER.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the replacement marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Override the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Nesting limit applied by [`redact`](Self::redact).
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns `true` if `key` contains any sensitive fragment.
    #[must_use]
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.fragments.iter().any(|fragment| key.contains(fragment.as_str()))
    }

    /// Return a redacted copy of `value`.
    #[must_use]
    pub fn redact(&self, value: &Value) -> Value {
        self.walk(value, 0)
    }

    fn walk(&self, value: &Value, depth: usize) -> Value {
        match value {
            Value::Object(_) | Value::Array(_) if depth >= self.max_depth => {
                Value::String(DEPTH_LIMIT_MARKER.to_string())
            }
            Value::Object(map) => {
                let mut redacted = Map::with_capacity(map.len());
                for (key, child) in map {
                    let replacement = if self.is_sensitive(key) {
                        Value::String(self.marker.clone())
                    } else {
                        self.walk(child, depth + 1)
                    };
                    redacted.insert(key.clone(), replacement);
                }
                Value::Object(redacted)
            }
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.walk(item, depth + 1)).collect())
            }
            scalar => scalar.clone(),
        }
    }
}

/// Redact `value` with the default fragments and limits.
#[must_use]
pub fn redact_value(value: &Value) -> Value {
    Redactor::default().redact(value)
}
