//! Types exchanged with the hosted backend's table-query API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_domain_enum_conversions;

/// Entry point a query was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum QueryOperation {
    Select,
    Insert,
    Update,
    Delete,
}

impl_domain_enum_conversions!(QueryOperation {
    Select => "select",
    Insert => "insert",
    Update => "update",
    Delete => "delete",
});

impl QueryOperation {
    /// Upper-case tag used in log actions (`DB_SELECT_START`).
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Ordering options for an `order` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOptions {
    pub ascending: bool,
    pub nulls_first: Option<bool>,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self { ascending: true, nulls_first: None }
    }
}

impl OrderOptions {
    /// Descending order.
    pub fn descending() -> Self {
        Self { ascending: false, ..Self::default() }
    }
}

/// Error object returned by the backend inside a resolved response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct BackendError {
    pub message: String,
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self { message: message.into(), code: Some(code.into()), details: None, hint: None }
    }
}

/// Resolved `{ data, error }` value of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub data: Value,
    pub error: Option<BackendError>,
}

impl QueryResponse {
    /// Successful response carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self { data, error: None }
    }

    /// Failed response with no data.
    pub fn failed(error: BackendError) -> Self {
        Self { data: Value::Null, error: Some(error) }
    }

    /// `true` when the backend reported no error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Rows returned or affected: array length, `1` for a single object,
    /// `0` for null.
    pub fn record_count(&self) -> usize {
        match &self.data {
            Value::Array(rows) => rows.len(),
            Value::Null => 0,
            _ => 1,
        }
    }
}

/// Rejection of the query itself (transport failure, aborted request).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct QueryError {
    pub message: String,
    pub code: Option<String>,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}
