//! Session core: the owning handle for one remote browser session.
//!
//! A [`Session`] bundles the endpoint, the transport, the optional session
//! id, default capabilities, and per-session HTTP configuration behind an
//! `Arc`, so clones are cheap and share state. Every catalog command is an
//! inherent `async fn` grouped by concern:
//!
//! | module        | commands                                              |
//! |---------------|-------------------------------------------------------|
//! | `lifecycle`   | init, attach, detach, quit, status, sessions          |
//! | `navigation`  | get, url, back, forward, refresh, title, source       |
//! | `window`      | windows, frames, contexts, size/position, new_window  |
//! | `elements`    | lookup, locator strategies, by-strategy families      |
//! | `interaction` | element-scoped getters and actions                    |
//! | `scripting`   | execute, execute_async, eval_expr, forwarding bridge  |
//! | `state`       | timeouts, cookies, alerts, geolocation, logs          |
//! | `touch`       | touch/gesture and pointer commands                    |
//! | `screenshot`  | take_screenshot, save_screenshot                      |
//! | `wait`        | condition polling                                     |
//!
//! Mutating the HTTP configuration while requests are in flight is not
//! coordinated; reconfigure at setup time. Concurrent `init` calls on one
//! session race for the stored id.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{HttpConfig, HttpOverrides};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::protocol::{parse_simple, parse_with_data, WireRequest};
use crate::transport::{Endpoint, HttpTransport, RawResponse, Transport};

pub mod capabilities;
pub mod elements;
mod interaction;
pub mod lifecycle;
mod navigation;
mod screenshot;
mod scripting;
pub mod state;
pub mod touch;
pub mod wait;
mod window;

pub use capabilities::Capabilities;
pub use elements::Strategy;
pub use interaction::Rect;
pub use state::{Cookie, GeoLocation, LogEntry, Orientation};
pub use touch::MouseButton;
pub use wait::WaitOptions;
pub use window::{FrameRef, Position, Size};

// ============================================================================
// Command Events
// ============================================================================

/// Observable command lifecycle event.
///
/// Exactly one of `Response` or `Failure` follows each `Call`.
#[derive(Debug, Clone)]
pub enum CommandEvent {
    /// A command is about to hit the wire.
    Call {
        /// Catalog command name, e.g. `elementByXPath`.
        command: String,
        /// Request body, when the command has one.
        params: Option<Value>,
    },
    /// A command completed; `value` is the normalized payload (`Null` for
    /// no-value commands).
    Response { command: String, value: Value },
    /// A command failed at any layer.
    Failure { command: String, message: String },
}

/// Registered per-session event callback.
pub type EventHandler = Arc<dyn Fn(&CommandEvent) + Send + Sync>;

// ============================================================================
// SessionBuilder
// ============================================================================

/// Configures and creates a [`Session`].
pub struct SessionBuilder {
    endpoint: Endpoint,
    http_config: HttpConfig,
    default_capabilities: Capabilities,
    merge_defaults: bool,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("endpoint", &self.endpoint)
            .field("http_config", &self.http_config)
            .field("merge_defaults", &self.merge_defaults)
            .finish_non_exhaustive()
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            http_config: HttpConfig::new(),
            default_capabilities: Capabilities::standard_defaults(),
            merge_defaults: true,
            transport: None,
        }
    }
}

impl SessionBuilder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Sets the initial HTTP configuration.
    #[must_use]
    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Replaces the default capabilities merged into `init`.
    #[must_use]
    pub fn default_capabilities(mut self, caps: Capabilities) -> Self {
        self.default_capabilities = caps;
        self
    }

    /// Disables merging of default capabilities into `init` requests.
    #[must_use]
    pub fn no_default_capabilities(mut self) -> Self {
        self.merge_defaults = false;
        self
    }

    /// Substitutes a custom transport (tests use this).
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the session. No wire traffic happens until `init`.
    pub fn build(self) -> Result<Session> {
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.http_config)?),
        };
        Ok(Session {
            inner: Arc::new(SessionInner {
                endpoint: self.endpoint,
                transport,
                session_id: Mutex::new(None),
                default_capabilities: Mutex::new(self.default_capabilities),
                merge_defaults: self.merge_defaults,
                http_config: Mutex::new(self.http_config),
                event_handler: Mutex::new(None),
            }),
        })
    }
}

// ============================================================================
// Session
// ============================================================================

struct SessionInner {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    session_id: Mutex<Option<String>>,
    default_capabilities: Mutex<Capabilities>,
    merge_defaults: bool,
    http_config: Mutex<HttpConfig>,
    event_handler: Mutex<Option<EventHandler>>,
}

/// Handle to one remote browser session. Cheap to clone; clones share the
/// session id and configuration.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.inner.endpoint)
            .field("session_id", &*self.inner.session_id.lock())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Starts building a session.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Creates a session against `endpoint` with default configuration.
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        Self::builder().endpoint(endpoint).build()
    }

    // ------------------------------------------------------------------
    // Accessors and configuration
    // ------------------------------------------------------------------

    /// The current session id, if a session is established.
    #[must_use]
    pub fn get_session_id(&self) -> Option<String> {
        self.inner.session_id.lock().clone()
    }

    /// Merges HTTP configuration overrides; takes effect for subsequent
    /// requests only.
    pub fn configure_http(&self, overrides: HttpOverrides) -> Result<()> {
        let proxy_override = overrides.proxy_override().map(str::to_string);
        self.inner.http_config.lock().merge(overrides);
        if let Some(proxy) = proxy_override {
            self.inner.transport.configure_proxy(Some(&proxy))?;
        }
        Ok(())
    }

    /// Registers the command event handler, replacing any previous one.
    pub fn on_command<F>(&self, handler: F)
    where
        F: Fn(&CommandEvent) + Send + Sync + 'static,
    {
        *self.inner.event_handler.lock() = Some(Arc::new(handler));
    }

    /// Removes the command event handler.
    pub fn clear_command_handler(&self) {
        *self.inner.event_handler.lock() = None;
    }

    pub(crate) fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    pub(crate) fn http_config_snapshot(&self) -> HttpConfig {
        self.inner.http_config.lock().clone()
    }

    pub(crate) fn set_session_id(&self, id: Option<String>) {
        *self.inner.session_id.lock() = id;
    }

    pub(crate) fn merge_defaults(&self) -> bool {
        self.inner.merge_defaults
    }

    pub(crate) fn default_capabilities_snapshot(&self) -> Capabilities {
        self.inner.default_capabilities.lock().clone()
    }

    // ------------------------------------------------------------------
    // Wire plumbing
    // ------------------------------------------------------------------

    pub(crate) fn emit(&self, event: CommandEvent) {
        // cloned out of the lock so a handler may re-register or clear
        // itself without deadlocking
        let handler = self.inner.event_handler.lock().clone();
        if let Some(handler) = handler {
            handler(&event);
        }
    }

    /// Resolves the request URL and performs the HTTP exchange.
    ///
    /// Commands that need a session id fail fast with [`Error::NoSession`]
    /// before touching the wire.
    pub(crate) async fn raw_call(&self, request: &WireRequest) -> Result<RawResponse> {
        let url = if request.path.needs_session() {
            let session_id = self.get_session_id().ok_or(Error::NoSession)?;
            self.inner.endpoint.command_url(&session_id, &request.path)?
        } else {
            self.inner.endpoint.command_url("", &request.path)?
        };
        let config = self.http_config_snapshot();
        self.inner
            .transport
            .send(request.method.clone(), url, request.data.clone(), &config)
            .await
    }

    /// Runs a no-value command: emits events, sends, expects an empty/`OK`
    /// body or a status-0 envelope.
    pub(crate) async fn call_simple(&self, command: &str, request: WireRequest) -> Result<()> {
        self.emit(CommandEvent::Call {
            command: command.to_string(),
            params: request.data.clone(),
        });
        debug!(command, "dispatching");
        let result = match self.raw_call(&request).await {
            Ok(response) => parse_simple(&response.body),
            Err(err) => Err(err),
        };
        self.settle(command, result.map(|()| Value::Null)).map(|_| ())
    }

    /// Runs a value-returning command: emits events, sends, unwraps the
    /// envelope value.
    pub(crate) async fn call_value(&self, command: &str, request: WireRequest) -> Result<Value> {
        self.emit(CommandEvent::Call {
            command: command.to_string(),
            params: request.data.clone(),
        });
        debug!(command, "dispatching");
        let result = match self.raw_call(&request).await {
            Ok(response) => parse_with_data(&response.body).map(|envelope| envelope.value),
            Err(err) => Err(err),
        };
        self.settle(command, result)
    }

    /// Emits the terminal event for a command and passes the result
    /// through.
    fn settle(&self, command: &str, result: Result<Value>) -> Result<Value> {
        match result {
            Ok(value) => {
                trace!(command, "completed");
                self.emit(CommandEvent::Response {
                    command: command.to_string(),
                    value: value.clone(),
                });
                Ok(value)
            }
            Err(err) => {
                debug!(command, error = %err, "failed");
                self.emit(CommandEvent::Failure {
                    command: command.to_string(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Element construction
    // ------------------------------------------------------------------

    /// Mints an element handle owned by this session.
    #[must_use]
    pub fn new_element(&self, id: impl Into<String>) -> Element {
        Element::new(self.clone(), id)
    }

    /// Converts a `{ELEMENT: id}` wire value into a handle.
    pub(crate) fn element_from_value(&self, value: &Value) -> Result<Element> {
        Element::from_wire(self, value).ok_or_else(|| {
            Error::unexpected_value("response value is not an element reference", value.clone())
        })
    }

    /// Converts an array of `{ELEMENT: id}` wire values into handles.
    pub(crate) fn elements_from_value(&self, value: &Value) -> Result<Vec<Element>> {
        let items = value.as_array().ok_or_else(|| {
            Error::unexpected_value("response value is not an element array", value.clone())
        })?;
        items.iter().map(|item| self.element_from_value(item)).collect()
    }
}

// ============================================================================
// Value Decoding
// ============================================================================

/// Deserializes a normalized wire value into a typed result.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value.clone())
        .map_err(|_| Error::unexpected_value("response value has unexpected shape", value))
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    use std::collections::VecDeque;

    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use reqwest::Method;
    use serde_json::json;
    use url::Url;

    /// One request as the mock transport saw it.
    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub method: Method,
        pub url: Url,
        pub body: Option<Value>,
    }

    /// Canned-response transport for session tests.
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        responses: Mutex<VecDeque<RawResponse>>,
        log: Mutex<Vec<RecordedRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Queues a raw response.
        pub fn push_raw(&self, status: u16, body: impl Into<String>) {
            self.responses.lock().push_back(RawResponse {
                status,
                headers: HeaderMap::new(),
                body: body.into(),
            });
        }

        /// Queues a raw response with one header set.
        pub fn push_raw_with_header(
            &self,
            status: u16,
            body: impl Into<String>,
            name: &'static str,
            value: &str,
        ) {
            let mut headers = HeaderMap::new();
            headers.insert(name, value.parse().expect("valid header value"));
            self.responses.lock().push_back(RawResponse {
                status,
                headers,
                body: body.into(),
            });
        }

        /// Queues a status-0 envelope with `value`.
        pub fn push_value(&self, value: Value) {
            self.push_raw(
                200,
                json!({"sessionId": "sess-1", "status": 0, "value": value}).to_string(),
            );
        }

        /// Queues an empty-body success (simple commands).
        pub fn push_simple_ok(&self) {
            self.push_raw(200, "");
        }

        /// Queues a non-zero-status envelope.
        pub fn push_status(&self, status: i64, message: &str) {
            self.push_raw(
                500,
                json!({"status": status, "value": {"message": message}}).to_string(),
            );
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.log.lock().clone()
        }

        pub fn last_request(&self) -> RecordedRequest {
            self.log.lock().last().cloned().expect("no requests recorded")
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(
            &self,
            method: Method,
            url: Url,
            body: Option<Value>,
            _config: &HttpConfig,
        ) -> Result<RawResponse> {
            self.log.lock().push(RecordedRequest { method, url, body });
            self.responses
                .lock()
                .pop_front()
                .ok_or_else(|| Error::transport("mock transport exhausted"))
        }
    }

    /// Installs a test-writer subscriber so `RUST_LOG` works under
    /// `cargo test`; repeated calls are no-ops.
    pub(crate) fn init_tracing() {
        use tracing_subscriber::EnvFilter;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// A session wired to `transport` with an established session id.
    pub(crate) fn attached_session(transport: Arc<MockTransport>) -> Session {
        let session = Session::builder()
            .transport(transport)
            .build()
            .expect("session builds");
        session.set_session_id(Some("sess-1".to_string()));
        session
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    use serde_json::json;

    #[tokio::test]
    async fn test_no_session_fails_fast() {
        let transport = MockTransport::new();
        let session = Session::builder()
            .transport(transport.clone())
            .build()
            .unwrap();
        let err = session
            .call_value("title", WireRequest::get("/title"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoSession));
        // nothing reached the wire
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_call_value_unwraps_envelope() {
        let transport = MockTransport::new();
        transport.push_value(json!("Page Title"));
        let session = attached_session(transport.clone());
        let value = session
            .call_value("title", WireRequest::get("/title"))
            .await
            .unwrap();
        assert_eq!(value, json!("Page Title"));
        let request = transport.last_request();
        assert!(request.url.as_str().ends_with("/session/sess-1/title"));
    }

    #[tokio::test]
    async fn test_events_call_then_response() {
        let transport = MockTransport::new();
        transport.push_value(json!(true));
        let session = attached_session(transport);
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        session.on_command(move |event| {
            let tag = match event {
                CommandEvent::Call { command, .. } => format!("call:{command}"),
                CommandEvent::Response { command, .. } => format!("response:{command}"),
                CommandEvent::Failure { command, .. } => format!("failure:{command}"),
            };
            sink.lock().push(tag);
        });
        session
            .call_value("isDisplayed", WireRequest::get("/displayed"))
            .await
            .unwrap();
        assert_eq!(
            *events.lock(),
            vec!["call:isDisplayed", "response:isDisplayed"]
        );
    }

    #[tokio::test]
    async fn test_events_failure_on_protocol_error() {
        let transport = MockTransport::new();
        transport.push_status(7, "not found");
        let session = attached_session(transport);
        let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        session.on_command(move |event| {
            if let CommandEvent::Failure { message, .. } = event {
                sink.lock().push(message.clone());
            }
        });
        let err = session
            .call_value("element", WireRequest::post("/element"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(7));
        assert_eq!(events.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_handler_may_reconfigure_itself() {
        let transport = MockTransport::new();
        transport.push_value(json!(true));
        transport.push_value(json!(true));
        let session = attached_session(transport);

        let calls = Arc::new(Mutex::new(0u32));
        let sink = calls.clone();
        let inner = session.clone();
        session.on_command(move |_event| {
            *sink.lock() += 1;
            // removing the handler from inside the handler must not
            // deadlock
            inner.clear_command_handler();
        });

        session
            .call_value("isDisplayed", WireRequest::get("/displayed"))
            .await
            .unwrap();
        session
            .call_value("isDisplayed", WireRequest::get("/displayed"))
            .await
            .unwrap();
        // the handler saw only the first Call event before removing itself
        assert_eq!(*calls.lock(), 1);
    }

    #[tokio::test]
    async fn test_call_simple_accepts_empty_body() {
        init_tracing();
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport);
        session
            .call_simple("back", WireRequest::post("/back"))
            .await
            .unwrap();
    }
}
