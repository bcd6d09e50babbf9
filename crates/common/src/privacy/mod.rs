//! Privacy Module
//!
//! Key-based redaction of sensitive values in structured log payloads.

pub mod redact;

pub use redact::{redact_value, Redactor, DEPTH_LIMIT_MARKER, REDACTED_MARKER};
