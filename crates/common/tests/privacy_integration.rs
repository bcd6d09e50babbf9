//! Integration tests for payload redaction.

#![cfg(feature = "foundation")]

use gymtrack_common::privacy::{redact_value, Redactor, REDACTED_MARKER};
use serde_json::json;

/// A typical insert preview: a list of rows, one of which carries an access
/// token nested inside metadata.
#[test]
fn test_insert_preview_rows_are_redacted_per_row() {
    let rows = json!([
        { "name": "Bench Press", "sets": 3, "reps": 10 },
        { "name": "Squat", "meta": { "access_token": "abc", "notes": "deep" } },
    ]);

    let redacted = redact_value(&rows);

    assert_eq!(redacted[0], rows[0]);
    assert_eq!(redacted[1]["meta"]["access_token"], json!(REDACTED_MARKER));
    assert_eq!(redacted[1]["meta"]["notes"], json!("deep"));
}

#[test]
fn test_redaction_does_not_mutate_input() {
    let payload = json!({ "password": "hunter2" });
    let redacted = Redactor::default().redact(&payload);
    assert_eq!(payload["password"], json!("hunter2"));
    assert_ne!(redacted, payload);
}

#[test]
fn test_scalars_pass_through() {
    assert_eq!(redact_value(&json!(42)), json!(42));
    assert_eq!(redact_value(&json!(null)), json!(null));
    assert_eq!(redact_value(&json!("token")), json!("token"));
}
