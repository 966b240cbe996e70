//! Wire envelope parsing.
//!
//! Every JSON Wire response carries a `{sessionId, status, value}` envelope.
//! Two parsing strategies exist, selected per command:
//!
//! - [`parse_simple`] for commands that return no value: empty or `OK`
//!   bodies succeed outright, anything else must be an envelope with
//!   status 0.
//! - [`parse_with_data`] for commands that return a value: the envelope is
//!   mandatory, non-zero statuses map through the status table, and values
//!   shaped like a remote driver exception are errors even under status 0.
//!
//! Element-reference rewriting happens one layer up, in the session (it
//! needs the owning session to mint handles).

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::protocol::status::status_description;

// ============================================================================
// WireEnvelope
// ============================================================================

/// The legacy JSON Wire response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WireEnvelope {
    /// Session id echoed by the server, when present.
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
    /// Wire status code; 0 is success.
    #[serde(default)]
    pub status: i64,
    /// Command-specific payload.
    #[serde(default)]
    pub value: Value,
}

// ============================================================================
// Driver Exception Detection
// ============================================================================

/// Returns `true` if `value` is shaped like a remote driver exception.
///
/// The marker is a `class` field naming a `WebDriverException` type.
#[must_use]
pub fn is_driver_exception(value: &Value) -> bool {
    value
        .get("class")
        .and_then(Value::as_str)
        .is_some_and(|class| class.contains("WebDriverException"))
}

// ============================================================================
// Parsing Strategies
// ============================================================================

/// Parses a response for a command that returns no value.
///
/// Empty and `OK` bodies are the expected non-envelope success shapes.
pub fn parse_simple(raw: &str) -> Result<()> {
    let raw = strip_nuls(raw);
    if raw.is_empty() || raw == "OK" {
        return Ok(());
    }

    let parsed: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(_) => {
            return Err(Error::unexpected_value(
                "unexpected data in no-value response",
                Value::String(raw),
            ));
        }
    };

    match parsed.get("status").and_then(Value::as_i64) {
        Some(0) => Ok(()),
        Some(status) => Err(status_error(status, parsed.get("value"))),
        None => Err(Error::unexpected_value(
            "unexpected data in no-value response",
            parsed,
        )),
    }
}

/// Parses a response for a command that returns a value.
///
/// Returns the full envelope so callers can also read the echoed session
/// id (used by `init`).
pub fn parse_with_data(raw: &str) -> Result<WireEnvelope> {
    let raw = strip_nuls(raw);
    let envelope: WireEnvelope =
        serde_json::from_str(&raw).map_err(|_| Error::malformed_response(raw.clone()))?;

    if envelope.status != 0 {
        return Err(status_error(envelope.status, Some(&envelope.value)));
    }
    if is_driver_exception(&envelope.value) {
        let message = envelope
            .value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("remote driver exception")
            .to_string();
        return Err(Error::DriverException {
            message,
            value: envelope.value,
        });
    }

    Ok(envelope)
}

// ============================================================================
// Helpers
// ============================================================================

/// Builds a protocol error from a non-zero status and optional value.
fn status_error(status: i64, value: Option<&Value>) -> Error {
    let driver_message = value
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);
    Error::Status {
        status,
        description: status_description(status),
        driver_message,
    }
}

/// Removes NUL bytes some drivers leak into response bodies.
fn strip_nuls(raw: &str) -> String {
    raw.chars().filter(|&c| c != '\0').collect::<String>()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_simple_empty_and_ok() {
        assert!(parse_simple("").is_ok());
        assert!(parse_simple("OK").is_ok());
    }

    #[test]
    fn test_simple_envelope_success() {
        assert!(parse_simple(r#"{"sessionId":"s","status":0,"value":null}"#).is_ok());
    }

    #[test]
    fn test_simple_envelope_failure() {
        let err = parse_simple(r#"{"status":7,"value":{"message":"gone"}}"#).unwrap_err();
        assert_eq!(err.status(), Some(7));
        assert!(err.to_string().contains("NoSuchElement"));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_simple_garbage() {
        let err = parse_simple("not json at all").unwrap_err();
        assert!(matches!(err, Error::UnexpectedValue { .. }));
    }

    #[test]
    fn test_with_data_unwraps_value() {
        let envelope =
            parse_with_data(r#"{"sessionId":"abc","status":0,"value":"hello"}"#).unwrap();
        assert_eq!(envelope.session_id.as_deref(), Some("abc"));
        assert_eq!(envelope.value, json!("hello"));
    }

    #[test]
    fn test_with_data_not_json() {
        let err = parse_with_data("<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn test_with_data_status_error_carries_description() {
        let err = parse_with_data(r#"{"status":10,"value":null}"#).unwrap_err();
        assert_eq!(err.status(), Some(10));
        assert!(err.to_string().contains("StaleElementReference"));
    }

    #[test]
    fn test_with_data_unknown_status() {
        let err = parse_with_data(r#"{"status":77,"value":null}"#).unwrap_err();
        assert_eq!(err.status(), Some(77));
    }

    #[test]
    fn test_driver_exception_under_status_zero() {
        let raw = r#"{"status":0,"value":{"class":"org.openqa.selenium.WebDriverException","message":"kaboom"}}"#;
        let err = parse_with_data(raw).unwrap_err();
        match err {
            Error::DriverException { message, .. } => assert_eq!(message, "kaboom"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_is_driver_exception_shapes() {
        assert!(is_driver_exception(&json!({
            "class": "o.o.s.WebDriverException", "message": "x"
        })));
        assert!(!is_driver_exception(&json!({"class": "SomethingElse"})));
        assert!(!is_driver_exception(&json!("plain string")));
        assert!(!is_driver_exception(&json!({"message": "no class"})));
    }

    #[test]
    fn test_strip_nuls() {
        assert!(parse_simple("\0\0").is_ok());
        let envelope = parse_with_data("{\"status\":0,\"value\":1}\0").unwrap();
        assert_eq!(envelope.value, json!(1));
    }
}
