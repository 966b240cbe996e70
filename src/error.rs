//! Error types for the JSON Wire Protocol client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use jsonwire_client::{Result, Error};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     let element = session.element_by_css("#submit").await?;
//!     element.click().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Transport | [`Error::Transport`], [`Error::Timeout`] |
//! | Response | [`Error::MalformedResponse`], [`Error::UnexpectedValue`] |
//! | Protocol | [`Error::Status`], [`Error::DriverException`] |
//! | Client usage | [`Error::NoSession`], [`Error::InvalidArgument`], [`Error::ConditionNotSatisfied`] |
//! | Session setup | [`Error::EnvironmentUnavailable`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::UrlParse`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use serde_json::Value;
use thiserror::Error;

use crate::protocol::StatusDescription;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Network-level failure (connection refused, reset, DNS, ...).
    ///
    /// Retried per [`HttpConfig`](crate::config::HttpConfig) policy before
    /// being surfaced.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// Request timed out at the transport layer.
    ///
    /// Treated as a retriable transport failure.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Milliseconds waited before aborting the request.
        timeout_ms: u64,
    },

    // ========================================================================
    // Response Errors
    // ========================================================================
    /// Response body is not valid JSON where JSON was expected.
    #[error("Not JSON response: {data}")]
    MalformedResponse {
        /// The offending (trimmed) body.
        data: String,
    },

    /// Response parsed but did not have the expected shape.
    ///
    /// Covers missing `ELEMENT` references, non-array element lists, and
    /// unexpected data in no-value responses.
    #[error("Unexpected response: {message}")]
    UnexpectedValue {
        /// What was wrong with the value.
        message: String,
        /// The offending value.
        value: Value,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Non-zero wire status code.
    ///
    /// Carries the status, the looked-up summary/detail, and any
    /// driver-supplied message.
    #[error("Error response status: {status}{}{}",
        description.map(|d| format!(", {} - {}", d.summary, d.detail)).unwrap_or_default(),
        driver_message.as_ref().map(|m| format!(" Driver error: {m}")).unwrap_or_default())]
    Status {
        /// The wire status code.
        status: i64,
        /// Summary/detail from the fixed status table, when known.
        description: Option<&'static StatusDescription>,
        /// Message embedded in the response value, when present.
        driver_message: Option<String>,
    },

    /// Response value shaped like a remote driver exception.
    ///
    /// Always an error, even when the outer status was 0.
    #[error("Driver exception: {message}")]
    DriverException {
        /// Message carried by the remote exception.
        message: String,
        /// The raw exception value.
        value: Value,
    },

    // ========================================================================
    // Client-Usage Errors
    // ========================================================================
    /// A session-scoped command was issued with no active session.
    #[error("No active session, call init() first")]
    NoSession,

    /// Missing or invalid argument.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// Polling deadline elapsed without the condition being satisfied.
    #[error("Condition wasn't satisfied after {timeout_ms}ms")]
    ConditionNotSatisfied {
        /// Milliseconds the condition was polled for.
        timeout_ms: u64,
    },

    /// Polling deadline elapsed without any element satisfying the asserter.
    #[error("Element condition wasn't satisfied after {timeout_ms}ms")]
    ElementConditionNotSatisfied {
        /// Milliseconds the condition was polled for.
        timeout_ms: u64,
    },

    /// Session creation failed and no session id could be recovered.
    #[error("The environment you requested was unavailable: {data}")]
    EnvironmentUnavailable {
        /// Stripped response body, for diagnostics.
        data: String,
    },

    // ========================================================================
    // Polling Marker
    // ========================================================================
    /// Marker wrapper used by asserters to signal "not yet satisfied".
    ///
    /// The polling engine treats this as an unsatisfied poll instead of a
    /// hard failure; every other error aborts polling.
    #[error("retriable: {0}")]
    Retriable(#[source] Box<Error>),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Creates a malformed-response error, trimming the body for display.
    #[inline]
    pub fn malformed_response(data: impl Into<String>) -> Self {
        Self::MalformedResponse {
            data: trim_to_length(data.into(), MAX_ERROR_DATA),
        }
    }

    /// Creates an unexpected-value error.
    #[inline]
    pub fn unexpected_value(message: impl Into<String>, value: Value) -> Self {
        Self::UnexpectedValue {
            message: message.into(),
            value,
        }
    }

    /// Creates an invalid-argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an environment-unavailable error.
    #[inline]
    pub fn environment_unavailable(data: impl Into<String>) -> Self {
        Self::EnvironmentUnavailable {
            data: trim_to_length(data.into(), MAX_ERROR_DATA),
        }
    }

    /// Wraps an error in the retriable marker for the polling engine.
    #[inline]
    pub fn retriable(err: Error) -> Self {
        Self::Retriable(Box::new(err))
    }

    /// Converts a `reqwest` failure into the transport taxonomy.
    ///
    /// Timeouts become [`Error::Timeout`]; everything else becomes
    /// [`Error::Transport`].
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_ms }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a transport-layer failure.
    ///
    /// Only these failures are subject to the retry policy.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Returns `true` if this error carries the polling retriable marker.
    #[inline]
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Retriable(_))
    }

    /// Returns `true` if this is a wire protocol error (non-zero status or
    /// remote exception).
    #[inline]
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::DriverException { .. })
    }

    /// Returns `true` if this is a condition-not-satisfied polling failure.
    #[inline]
    #[must_use]
    pub fn is_condition_failure(&self) -> bool {
        matches!(
            self,
            Self::ConditionNotSatisfied { .. } | Self::ElementConditionNotSatisfied { .. }
        )
    }

    /// Returns the wire status code for protocol errors.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<i64> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Maximum length of response data embedded in error messages.
const MAX_ERROR_DATA: usize = 500;

fn trim_to_length(s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        s
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::protocol::status_description;

    #[test]
    fn test_transport_display() {
        let err = Error::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_status_display_with_description() {
        let err = Error::Status {
            status: 7,
            description: status_description(7),
            driver_message: Some("boom".into()),
        };
        let text = err.to_string();
        assert!(text.starts_with("Error response status: 7"));
        assert!(text.contains("NoSuchElement"));
        assert!(text.contains("Driver error: boom"));
    }

    #[test]
    fn test_is_transport() {
        assert!(Error::transport("x").is_transport());
        assert!(Error::timeout(100).is_transport());
        assert!(!Error::NoSession.is_transport());
    }

    #[test]
    fn test_is_retriable_marker() {
        let inner = Error::invalid_argument("x");
        assert!(Error::retriable(inner).is_retriable());
        assert!(!Error::transport("x").is_retriable());
    }

    #[test]
    fn test_condition_failure() {
        assert!(Error::ConditionNotSatisfied { timeout_ms: 100 }.is_condition_failure());
        assert!(Error::ElementConditionNotSatisfied { timeout_ms: 100 }.is_condition_failure());
        assert!(!Error::NoSession.is_condition_failure());
    }

    #[test]
    fn test_trim_long_data() {
        let long = "x".repeat(600);
        match Error::malformed_response(long) {
            Error::MalformedResponse { data } => {
                assert_eq!(data.len(), 503);
                assert!(data.ends_with("..."));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
