//! Timeouts, cookies, alerts, geolocation, orientation, and logs.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::protocol::WireRequest;
use crate::session::{decode, Session};

// ============================================================================
// Cookie
// ============================================================================

/// A browser cookie.
///
/// `secure` defaults to `false` and is always sent; drivers reject cookies
/// without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, rename = "httpOnly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// Expiry as seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

impl Cookie {
    /// Creates a cookie with just a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            secure: false,
            http_only: None,
            expiry: None,
        }
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    #[must_use]
    pub fn expiry(mut self, epoch_seconds: i64) -> Self {
        self.expiry = Some(epoch_seconds);
        self
    }
}

// ============================================================================
// Supporting Types
// ============================================================================

/// Device orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

/// One entry from a remote log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: i64,
    pub level: String,
    pub message: String,
}

// ============================================================================
// Commands
// ============================================================================

impl Session {
    // ------------------------------------------------------------------
    // Timeouts
    // ------------------------------------------------------------------

    /// Sets the implicit element-lookup timeout.
    pub async fn set_implicit_wait_timeout(&self, timeout: Duration) -> Result<()> {
        self.call_simple(
            "setImplicitWaitTimeout",
            WireRequest::post_data(
                "/timeouts/implicit_wait",
                json!({"ms": timeout.as_millis() as u64}),
            ),
        )
        .await
    }

    /// Sets the asynchronous-script timeout.
    pub async fn set_async_script_timeout(&self, timeout: Duration) -> Result<()> {
        self.call_simple(
            "setAsyncScriptTimeout",
            WireRequest::post_data(
                "/timeouts/async_script",
                json!({"ms": timeout.as_millis() as u64}),
            ),
        )
        .await
    }

    /// Sets the page-load timeout.
    pub async fn set_page_load_timeout(&self, timeout: Duration) -> Result<()> {
        self.call_simple(
            "setPageLoadTimeout",
            WireRequest::post_data(
                "/timeouts",
                json!({"type": "page load", "ms": timeout.as_millis() as u64}),
            ),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Cookies
    // ------------------------------------------------------------------

    /// All cookies visible to the current page.
    pub async fn all_cookies(&self) -> Result<Vec<Cookie>> {
        decode(
            self.call_value("allCookies", WireRequest::get("/cookie"))
                .await?,
        )
    }

    /// Sets a cookie.
    pub async fn set_cookie(&self, cookie: Cookie) -> Result<()> {
        self.call_simple(
            "setCookie",
            WireRequest::post_data("/cookie", json!({"cookie": cookie})),
        )
        .await
    }

    /// Deletes the named cookie.
    pub async fn delete_cookie(&self, name: &str) -> Result<()> {
        let encoded = urlencoding::encode(name);
        self.call_simple(
            "deleteCookie",
            WireRequest::delete(format!("/cookie/{encoded}")),
        )
        .await
    }

    /// Deletes every cookie visible to the current page.
    pub async fn delete_all_cookies(&self) -> Result<()> {
        self.call_simple("deleteAllCookies", WireRequest::delete("/cookie"))
            .await
    }

    // ------------------------------------------------------------------
    // Alerts
    // ------------------------------------------------------------------

    /// Text of the open alert.
    pub async fn alert_text(&self) -> Result<String> {
        decode(
            self.call_value("alertText", WireRequest::get("/alert_text"))
                .await?,
        )
    }

    /// Types into the open prompt.
    pub async fn alert_keys(&self, text: &str) -> Result<()> {
        self.call_simple(
            "alertKeys",
            WireRequest::post_data("/alert_text", json!({"text": text})),
        )
        .await
    }

    /// Accepts the open alert.
    pub async fn accept_alert(&self) -> Result<()> {
        self.call_simple("acceptAlert", WireRequest::post("/accept_alert"))
            .await
    }

    /// Dismisses the open alert.
    pub async fn dismiss_alert(&self) -> Result<()> {
        self.call_simple("dismissAlert", WireRequest::post("/dismiss_alert"))
            .await
    }

    // ------------------------------------------------------------------
    // Geolocation and orientation
    // ------------------------------------------------------------------

    pub async fn geo_location(&self) -> Result<GeoLocation> {
        decode(
            self.call_value("getGeoLocation", WireRequest::get("/location"))
                .await?,
        )
    }

    pub async fn set_geo_location(&self, location: GeoLocation) -> Result<()> {
        self.call_simple(
            "setGeoLocation",
            WireRequest::post_data("/location", json!({"location": location})),
        )
        .await
    }

    pub async fn orientation(&self) -> Result<Orientation> {
        decode(
            self.call_value("getOrientation", WireRequest::get("/orientation"))
                .await?,
        )
    }

    pub async fn set_orientation(&self, orientation: Orientation) -> Result<()> {
        self.call_simple(
            "setOrientation",
            WireRequest::post_data("/orientation", json!({"orientation": orientation})),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Logs
    // ------------------------------------------------------------------

    /// Log types the remote end can produce.
    pub async fn log_types(&self) -> Result<Vec<String>> {
        decode(
            self.call_value("getLogTypes", WireRequest::get("/log/types"))
                .await?,
        )
    }

    /// Drains the named remote log.
    pub async fn log(&self, log_type: &str) -> Result<Vec<LogEntry>> {
        decode(
            self.call_value(
                "getLogs",
                WireRequest::post_data("/log", json!({"type": log_type})),
            )
            .await?,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;

    #[tokio::test]
    async fn test_set_cookie_secure_defaults_false() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());

        session
            .set_cookie(Cookie::new("token", "abc123"))
            .await
            .unwrap();

        let body = transport.last_request().body.unwrap();
        assert_eq!(
            body,
            json!({"cookie": {"name": "token", "value": "abc123", "secure": false}})
        );
    }

    #[tokio::test]
    async fn test_delete_cookie_encodes_name() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());

        session.delete_cookie("weird name").await.unwrap();
        assert!(transport
            .last_request()
            .url
            .as_str()
            .ends_with("/cookie/weird%20name"));
    }

    #[tokio::test]
    async fn test_page_load_timeout_body() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());

        session
            .set_page_load_timeout(Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(
            transport.last_request().body,
            Some(json!({"type": "page load", "ms": 30000}))
        );
    }

    #[tokio::test]
    async fn test_orientation_roundtrip_shape() {
        let transport = MockTransport::new();
        transport.push_value(json!("LANDSCAPE"));
        let session = attached_session(transport);

        assert_eq!(
            session.orientation().await.unwrap(),
            Orientation::Landscape
        );
    }

    #[tokio::test]
    async fn test_log_entries() {
        let transport = MockTransport::new();
        transport.push_value(json!([
            {"timestamp": 1000, "level": "INFO", "message": "loaded"}
        ]));
        let session = attached_session(transport.clone());

        let entries = session.log("browser").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "INFO");
        assert_eq!(
            transport.last_request().body,
            Some(json!({"type": "browser"}))
        );
    }
}
