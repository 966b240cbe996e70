//! Wire request descriptor.
//!
//! Each catalog command reduces to one [`WireRequest`]: an HTTP method, a
//! command path, and an optional JSON body. The session resolves the path
//! against its endpoint and session id before handing the request to the
//! transport.

// ============================================================================
// Imports
// ============================================================================

use reqwest::Method;
use serde_json::Value;

// ============================================================================
// CommandPath
// ============================================================================

/// Where a command lives relative to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPath {
    /// `{endpoint}/session/{sessionId}` itself (e.g. `quit`,
    /// `session_capabilities`).
    SessionRoot,
    /// `{endpoint}/session/{sessionId}{path}`; the path must start with
    /// `/`.
    Relative(String),
    /// `{endpoint}/{path}`, bypassing the session id (e.g. `status`,
    /// `sessions`).
    Absolute(String),
}

impl CommandPath {
    /// Builds a session-relative path.
    #[inline]
    #[must_use]
    pub fn relative(path: impl Into<String>) -> Self {
        Self::Relative(path.into())
    }

    /// Builds an endpoint-absolute path.
    #[inline]
    #[must_use]
    pub fn absolute(path: impl Into<String>) -> Self {
        Self::Absolute(path.into())
    }

    /// Returns `true` if resolving this path requires a session id.
    #[inline]
    #[must_use]
    pub fn needs_session(&self) -> bool {
        !matches!(self, Self::Absolute(_))
    }
}

// ============================================================================
// WireRequest
// ============================================================================

/// A single command ready for the transport.
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// HTTP verb.
    pub method: Method,
    /// Command path.
    pub path: CommandPath,
    /// JSON body; `None` sends an empty object for POST and nothing
    /// otherwise.
    pub data: Option<Value>,
}

impl WireRequest {
    /// Creates a request with no body.
    #[inline]
    #[must_use]
    pub fn new(method: Method, path: CommandPath) -> Self {
        Self {
            method,
            path,
            data: None,
        }
    }

    /// Creates a request with a JSON body.
    #[inline]
    #[must_use]
    pub fn with_data(method: Method, path: CommandPath, data: Value) -> Self {
        Self {
            method,
            path,
            data: Some(data),
        }
    }

    /// Shorthand for a session-relative GET.
    #[inline]
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, CommandPath::relative(path))
    }

    /// Shorthand for a session-relative POST with no body.
    #[inline]
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, CommandPath::relative(path))
    }

    /// Shorthand for a session-relative POST with a body.
    #[inline]
    #[must_use]
    pub fn post_data(path: impl Into<String>, data: Value) -> Self {
        Self::with_data(Method::POST, CommandPath::relative(path), data)
    }

    /// Shorthand for a session-relative DELETE.
    #[inline]
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, CommandPath::relative(path))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_needs_session() {
        assert!(CommandPath::SessionRoot.needs_session());
        assert!(CommandPath::relative("/url").needs_session());
        assert!(!CommandPath::absolute("status").needs_session());
    }

    #[test]
    fn test_shorthands() {
        let req = WireRequest::post_data("/url", json!({"url": "https://example.com"}));
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, CommandPath::relative("/url"));
        assert_eq!(req.data, Some(json!({"url": "https://example.com"})));

        let req = WireRequest::delete("/cookie");
        assert_eq!(req.method, Method::DELETE);
        assert!(req.data.is_none());
    }
}
