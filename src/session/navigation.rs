//! Page navigation and document queries.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::json;

use crate::error::Result;
use crate::protocol::WireRequest;
use crate::session::{decode, Session};

impl Session {
    /// Navigates to `url`.
    ///
    /// A relative target is resolved against the configured
    /// [`base_url`](crate::HttpConfig::base_url) when one is set; absolute
    /// targets pass through untouched.
    pub async fn get(&self, url: &str) -> Result<()> {
        let target = self.resolve_navigation_target(url)?;
        self.call_simple("get", WireRequest::post_data("/url", json!({"url": target})))
            .await
    }

    /// The URL of the current page.
    pub async fn url(&self) -> Result<String> {
        decode(self.call_value("url", WireRequest::get("/url")).await?)
    }

    /// Navigates back in the browser history.
    pub async fn back(&self) -> Result<()> {
        self.call_simple("back", WireRequest::post("/back")).await
    }

    /// Navigates forward in the browser history.
    pub async fn forward(&self) -> Result<()> {
        self.call_simple("forward", WireRequest::post("/forward"))
            .await
    }

    /// Reloads the current page.
    pub async fn refresh(&self) -> Result<()> {
        self.call_simple("refresh", WireRequest::post("/refresh"))
            .await
    }

    /// The title of the current page.
    pub async fn title(&self) -> Result<String> {
        decode(self.call_value("title", WireRequest::get("/title")).await?)
    }

    /// The serialized source of the current page.
    pub async fn source(&self) -> Result<String> {
        decode(self.call_value("source", WireRequest::get("/source")).await?)
    }

    /// Pauses the calling task; purely client-side.
    pub async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Does nothing. Useful as a neutral step in chained call sequences.
    #[inline]
    pub fn noop(&self) {}

    fn resolve_navigation_target(&self, url: &str) -> Result<String> {
        let config = self.http_config_snapshot();
        match config.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                Ok(base.join(url)?.to_string())
            }
            _ => Ok(url.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::config::HttpOverrides;
    use crate::session::testing::*;

    use serde_json::json;
    use url::Url;

    #[tokio::test]
    async fn test_get_sends_url_body() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());

        session.get("https://example.com/login").await.unwrap();

        let request = transport.last_request();
        assert!(request.url.as_str().ends_with("/session/sess-1/url"));
        assert_eq!(
            request.body,
            Some(json!({"url": "https://example.com/login"}))
        );
    }

    #[tokio::test]
    async fn test_get_resolves_relative_against_base_url() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());
        session
            .configure_http(
                HttpOverrides::new().base_url(Url::parse("https://app.example.com/ui/").unwrap()),
            )
            .unwrap();

        session.get("login").await.unwrap();

        assert_eq!(
            transport.last_request().body,
            Some(json!({"url": "https://app.example.com/ui/login"}))
        );
    }

    #[tokio::test]
    async fn test_get_absolute_ignores_base_url() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());
        session
            .configure_http(
                HttpOverrides::new().base_url(Url::parse("https://app.example.com/").unwrap()),
            )
            .unwrap();

        session.get("http://other.example.com/").await.unwrap();

        assert_eq!(
            transport.last_request().body,
            Some(json!({"url": "http://other.example.com/"}))
        );
    }

    #[tokio::test]
    async fn test_title() {
        let transport = MockTransport::new();
        transport.push_value(json!("Dashboard"));
        let session = attached_session(transport);
        assert_eq!(session.title().await.unwrap(), "Dashboard");
    }
}
