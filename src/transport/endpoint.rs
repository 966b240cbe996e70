//! Server endpoint and URL construction.
//!
//! An [`Endpoint`] is the base address of the remote automation server
//! (default `http://127.0.0.1:4444/wd/hub`). It resolves the three command
//! path shapes:
//!
//! - init: `{endpoint}/session` (credentials kept, used once)
//! - session commands: `{endpoint}/session/{id}{relPath}` (credentials
//!   stripped)
//! - absolute commands: `{endpoint}/{path}` (e.g. `status`, `sessions`)

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use url::Url;

use crate::error::{Error, Result};
use crate::protocol::CommandPath;

// ============================================================================
// Constants
// ============================================================================

/// Default endpoint when none is configured.
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4444/wd/hub";

// ============================================================================
// Endpoint
// ============================================================================

/// Base address of the remote automation server.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Normalized base URL, possibly carrying credentials.
    base: Url,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // credentials never reach logs
        f.debug_struct("Endpoint")
            .field("base", &self.no_auth_base().as_str())
            .finish()
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::parse(DEFAULT_ENDPOINT).unwrap_or_else(|_| unreachable!("default endpoint parses"))
    }
}

impl Endpoint {
    /// Parses an endpoint URL, normalizing away any trailing slash.
    pub fn parse(url: &str) -> Result<Self> {
        let mut base = Url::parse(url)?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_argument(format!(
                "endpoint is not a base URL: {url}"
            )));
        }
        let trimmed = base.path().trim_end_matches('/').to_string();
        base.set_path(&trimmed);
        Ok(Self { base })
    }

    /// Builds an endpoint from host and port with default scheme and path.
    pub fn from_host_port(host: &str, port: u16) -> Result<Self> {
        Self::parse(&format!("http://{host}:{port}/wd/hub"))
    }

    /// Attaches basic-auth credentials (used only by the init call).
    #[must_use]
    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        let _ = self.base.set_username(user);
        let _ = self.base.set_password(Some(password));
        self
    }

    /// The base URL with credentials removed.
    #[must_use]
    pub fn no_auth_base(&self) -> Url {
        let mut base = self.base.clone();
        let _ = base.set_username("");
        let _ = base.set_password(None);
        base
    }

    /// URL for `POST /session` (the init call, which has no session id).
    ///
    /// Credentials are kept here; some grids authenticate session
    /// creation.
    pub fn init_url(&self) -> Result<Url> {
        join(&self.base, "/session")
    }

    /// Resolves a command path against this endpoint and session id.
    pub fn command_url(&self, session_id: &str, path: &CommandPath) -> Result<Url> {
        let base = self.no_auth_base();
        match path {
            CommandPath::SessionRoot => join(&base, &format!("/session/{session_id}")),
            CommandPath::Relative(rel) => join(&base, &format!("/session/{session_id}{rel}")),
            CommandPath::Absolute(abs) => join(&base, &format!("/{abs}")),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Appends `suffix` (starting with `/`) to the base URL path.
fn join(base: &Url, suffix: &str) -> Result<Url> {
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), suffix);
    Ok(Url::parse(&joined)?)
}

// ============================================================================
// Tests
// ============================================================================
