//! HTTP exchange and the transport retry policy.
//!
//! Only network-level failures (connection refused, connection reset,
//! request timeout) are retried. HTTP error statuses are *responses*: they
//! are handed to the protocol layer untouched and never retried.
//!
//! With `retries = N` a failing call makes exactly `1 + N` attempts;
//! [`Retries::Never`] short-circuits to a single attempt.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::{HttpConfig, Retries};
use crate::error::{Error, Result};

// ============================================================================
// RawResponse
// ============================================================================

/// An HTTP response as seen by the protocol layer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers (the init call reads `Location` from here).
    pub headers: HeaderMap,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Returns `true` for 2xx statuses.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Reads a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Moves one request to the server and returns the raw response.
///
/// The session depends on this trait rather than on a concrete client so
/// tests can substitute a canned transport.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends one request, applying the retry policy from `config`.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        config: &HttpConfig,
    ) -> Result<RawResponse>;

    /// Applies a proxy change to any underlying client. The default does
    /// nothing.
    fn configure_proxy(&self, _proxy: Option<&str>) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Retry Loop
// ============================================================================

/// Runs `attempt` until it succeeds, fails non-retriably, or the retry
/// budget is spent.
///
/// Transport failures (including timeouts) sleep `retry_delay` between
/// attempts; every other error returns immediately.
pub(crate) async fn send_with_retry<F, Fut, T>(config: &HttpConfig, mut attempt: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.retries.max_attempts();
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match attempt(attempts).await {
            Ok(response) => return Ok(response),
            Err(err) if err.is_transport() => {
                if config.retries == Retries::Never || attempts >= max_attempts {
                    return Err(err);
                }
                warn!(
                    attempt = attempts,
                    max_attempts,
                    delay_ms = config.retry_delay.as_millis() as u64,
                    error = %err,
                    "transport failure, retrying"
                );
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

// ============================================================================
// HttpTransport
// ============================================================================

/// The production [`Transport`] backed by `reqwest`.
///
/// The inner client is rebuilt when the proxy changes, so a transport can
/// be reconfigured mid-session.
pub struct HttpTransport {
    client: RwLock<reqwest::Client>,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            client: RwLock::new(reqwest::Client::new()),
        }
    }
}

impl HttpTransport {
    /// Creates a transport, honoring the proxy in `config` if set.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: RwLock::new(build_client(config.proxy.as_deref())?),
        })
    }

    /// Rebuilds the inner client with a new proxy (or none).
    pub fn set_proxy(&self, proxy: Option<&str>) -> Result<()> {
        let client = build_client(proxy)?;
        *self.client.write() = client;
        Ok(())
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        config: &HttpConfig,
    ) -> Result<RawResponse> {
        let timeout_ms = config.timeout.map_or(0, |t| t.as_millis() as u64);
        let mut builder = {
            let client = self.client.read();
            client.request(method.clone(), url.clone())
        };
        builder = builder.header(ACCEPT, "application/json");
        if method == Method::POST {
            // the wire protocol expects a JSON object body on every POST
            let payload = body.cloned().unwrap_or_else(|| Value::Object(Default::default()));
            builder = builder
                .header(CONTENT_TYPE, "application/json;charset=UTF-8")
                .json(&payload);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        trace!(%method, %url, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|err| Error::from_reqwest(err, timeout_ms))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|err| Error::from_reqwest(err, timeout_ms))?;
        debug!(%method, %url, status, body_len = body.len(), "received response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        config: &HttpConfig,
    ) -> Result<RawResponse> {
        send_with_retry(config, |_attempt| {
            self.send_once(method.clone(), url.clone(), body.as_ref(), config)
        })
        .await
    }

    fn configure_proxy(&self, proxy: Option<&str>) -> Result<()> {
        self.set_proxy(proxy)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn build_client(proxy: Option<&str>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(proxy) = proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|err| Error::invalid_argument(format!("invalid proxy: {err}")))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|err| Error::transport(format!("failed to build HTTP client: {err}")))
}

// ============================================================================
// Tests
// ============================================================================
