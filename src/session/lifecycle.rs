//! Session lifecycle: creation, adoption, teardown, and server-level
//! queries.
//!
//! `init` is the only command that sends credentials and the only one
//! allowed to run without an established session id. On success the id is
//! taken from the response envelope, falling back to the last path segment
//! of the `Location` header; when neither yields an id the session cannot
//! be used and `init` fails with the stripped response body attached.

// ============================================================================
// Imports
// ============================================================================

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::protocol::{parse_with_data, CommandPath, WireRequest};
use crate::session::{Capabilities, CommandEvent, Session};

impl Session {
    // ------------------------------------------------------------------
    // init / attach / detach / quit
    // ------------------------------------------------------------------

    /// Creates a remote session with the given desired capabilities.
    ///
    /// Default capabilities are merged in (explicit entries win) unless the
    /// session was built with
    /// [`no_default_capabilities`](crate::SessionBuilder::no_default_capabilities).
    /// Returns the capabilities the server actually granted.
    pub async fn init(&self, capabilities: Capabilities) -> Result<Capabilities> {
        let mut desired = capabilities;
        if self.merge_defaults() {
            desired.merge_missing(&self.default_capabilities_snapshot());
        }
        let body = json!({ "desiredCapabilities": desired });
        self.emit(CommandEvent::Call {
            command: "init".to_string(),
            params: Some(body.clone()),
        });
        debug!("initializing session");

        let url = self.endpoint().init_url()?;
        let config = self.http_config_snapshot();
        let response = match self
            .transport()
            .send(Method::POST, url, Some(body), &config)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                self.emit(CommandEvent::Failure {
                    command: "init".to_string(),
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        // session id: envelope first, then the Location header
        let envelope = parse_with_data(&response.body).ok();
        let session_id = envelope
            .as_ref()
            .and_then(|e| e.session_id.clone())
            .or_else(|| {
                response
                    .header("Location")
                    .and_then(|loc| loc.rsplit('/').next())
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
            });

        let Some(session_id) = session_id else {
            warn!(status = response.status, "no session id in init response");
            let err = Error::environment_unavailable(response.body);
            self.emit(CommandEvent::Failure {
                command: "init".to_string(),
                message: err.to_string(),
            });
            return Err(err);
        };

        self.set_session_id(Some(session_id));
        let granted = envelope
            .map(|e| match e.value {
                Value::Object(map) => serde_json::from_value(Value::Object(map))
                    .unwrap_or_default(),
                _ => Capabilities::new(),
            })
            .unwrap_or_default();
        self.emit(CommandEvent::Response {
            command: "init".to_string(),
            value: serde_json::to_value(&granted).unwrap_or(Value::Null),
        });
        Ok(granted)
    }

    /// Adopts an externally created session id. No wire traffic.
    pub fn attach(&self, session_id: impl Into<String>) {
        self.set_session_id(Some(session_id.into()));
    }

    /// Forgets the session id without closing the remote session.
    pub fn detach(&self) {
        self.set_session_id(None);
    }

    /// Closes the remote session and clears the stored id.
    ///
    /// Subsequent session-scoped commands fail fast until `init` or
    /// `attach` establishes a new id.
    pub async fn quit(&self) -> Result<()> {
        self.call_simple(
            "quit",
            WireRequest::new(Method::DELETE, CommandPath::SessionRoot),
        )
        .await?;
        self.set_session_id(None);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Server-level queries
    // ------------------------------------------------------------------

    /// Queries the remote server's status object.
    pub async fn status(&self) -> Result<Value> {
        self.call_value(
            "status",
            WireRequest::new(Method::GET, CommandPath::absolute("status")),
        )
        .await
    }

    /// Lists sessions active on the remote server.
    pub async fn sessions(&self) -> Result<Value> {
        self.call_value(
            "sessions",
            WireRequest::new(Method::GET, CommandPath::absolute("sessions")),
        )
        .await
    }

    /// Capabilities of the current session, via the session resource.
    pub async fn session_capabilities(&self) -> Result<Capabilities> {
        let value = self
            .call_value(
                "sessionCapabilities",
                WireRequest::new(Method::GET, CommandPath::SessionRoot),
            )
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// Capabilities of the current session, via the server-level session
    /// listing path (some drivers only answer one of the two).
    pub async fn alt_session_capabilities(&self) -> Result<Capabilities> {
        let session_id = self.get_session_id().ok_or(Error::NoSession)?;
        let value = self
            .call_value(
                "altSessionCapabilities",
                WireRequest::new(
                    Method::GET,
                    CommandPath::absolute(format!("session/{session_id}")),
                ),
            )
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }
}

// ============================================================================
// Tests
// ============================================================================
