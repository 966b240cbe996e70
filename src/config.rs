//! HTTP configuration for sessions.
//!
//! Each [`Session`](crate::Session) owns its own [`HttpConfig`], seeded from
//! [`HttpConfig::default()`] and adjusted through
//! [`Session::configure_http`](crate::Session::configure_http) or the
//! builder. Configuration is expected to happen once at setup; changing it
//! while requests are in flight is not coordinated.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default number of retries after a transport failure.
const DEFAULT_RETRIES: u32 = 3;

/// Default delay between retry attempts.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(15);

// ============================================================================
// Retries
// ============================================================================

/// Retry policy for transport-layer failures.
///
/// `Count(n)` performs the initial attempt plus up to `n` retries;
/// `Count(0)` tries exactly once. [`Retries::Never`] skips the retry
/// machinery entirely and fails on the first transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retries {
    /// Retry up to this many times after the initial attempt.
    Count(u32),
    /// Fail immediately on the first transport error.
    Never,
}

impl Retries {
    /// Parses the configuration sentinels.
    ///
    /// `"always"` maps to `Count(0)` and `"never"` to `Never`; a bare
    /// number is a retry count.
    pub fn from_sentinel(value: &str) -> Result<Self> {
        match value {
            "always" => Ok(Self::Count(0)),
            "never" => Ok(Self::Never),
            other => other
                .parse::<u32>()
                .map(Self::Count)
                .map_err(|_| Error::invalid_argument(format!("invalid retries value: {other}"))),
        }
    }

    /// Total number of attempts this policy allows.
    #[inline]
    #[must_use]
    pub fn max_attempts(self) -> u32 {
        match self {
            Self::Count(n) => 1 + n,
            Self::Never => 1,
        }
    }
}

impl Default for Retries {
    fn default() -> Self {
        Self::Count(DEFAULT_RETRIES)
    }
}

// ============================================================================
// HttpConfig
// ============================================================================

/// Per-session HTTP configuration.
///
/// # Fields
///
/// - `timeout`: per-request timeout; `None` means no client-side timeout
///   ("default" sentinel). Never negative by construction.
/// - `retries`: transport-failure retry policy.
/// - `retry_delay`: pause between retry attempts.
/// - `base_url`: base for relative navigation targets passed to
///   [`Session::get`](crate::Session::get).
/// - `proxy`: outbound HTTP proxy URL.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout, `None` for no timeout.
    pub timeout: Option<Duration>,
    /// Retry policy for transport failures.
    pub retries: Retries,
    /// Delay between retry attempts.
    pub retry_delay: Duration,
    /// Base URL for relative navigation targets.
    pub base_url: Option<Url>,
    /// Proxy URL for outbound requests.
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpConfig {
    /// Creates the default configuration (no timeout, 3 retries, 15ms
    /// delay, no base URL, no proxy).
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: None,
            retries: Retries::default(),
            retry_delay: DEFAULT_RETRY_DELAY,
            base_url: None,
            proxy: None,
        }
    }

    /// Sets the per-request timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Clears the per-request timeout (the "default" sentinel).
    #[inline]
    #[must_use]
    pub fn with_default_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Sets the retry policy.
    #[inline]
    #[must_use]
    pub fn with_retries(mut self, retries: Retries) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the delay between retries.
    #[inline]
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sets the base URL for relative navigation targets.
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the outbound proxy.
    #[inline]
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Merges non-`None` fields of `overrides` into `self`.
    ///
    /// Used by `configure_http`; fields absent from the override keep
    /// their current value.
    pub fn merge(&mut self, overrides: HttpOverrides) {
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if let Some(retries) = overrides.retries {
            self.retries = retries;
        }
        if let Some(delay) = overrides.retry_delay {
            self.retry_delay = delay;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(proxy) = overrides.proxy {
            self.proxy = Some(proxy);
        }
    }
}

// ============================================================================
// HttpOverrides
// ============================================================================

/// Partial configuration passed to
/// [`Session::configure_http`](crate::Session::configure_http).
///
/// `timeout: Some(None)` clears an existing timeout (the "default"
/// sentinel); `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct HttpOverrides {
    /// New timeout; the inner `None` clears it.
    pub timeout: Option<Option<Duration>>,
    /// New retry policy.
    pub retries: Option<Retries>,
    /// New retry delay.
    pub retry_delay: Option<Duration>,
    /// New base URL.
    pub base_url: Option<Url>,
    /// New proxy.
    pub proxy: Option<String>,
}

impl HttpOverrides {
    /// Creates an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the timeout.
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(Some(timeout));
        self
    }

    /// Clears the timeout ("default" sentinel).
    #[inline]
    #[must_use]
    pub fn default_timeout(mut self) -> Self {
        self.timeout = Some(None);
        self
    }

    /// Overrides the retry policy.
    #[inline]
    #[must_use]
    pub fn retries(mut self, retries: Retries) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Overrides the retry delay.
    #[inline]
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Overrides the base URL.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Overrides the proxy.
    #[inline]
    #[must_use]
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// The proxy override, if one is set.
    #[inline]
    #[must_use]
    pub fn proxy_override(&self) -> Option<&str> {
        self.proxy.as_deref()
    }
}

// ============================================================================
// Tests
// ============================================================================
