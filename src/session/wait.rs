//! Condition polling.
//!
//! One engine drives every wait. Per poll:
//!
//! 1. run the check; satisfied resolves the wait with its value
//! 2. a retriable error counts as unsatisfied; any other error aborts
//! 3. unsatisfied past the deadline earns exactly one last-chance poll
//!    after a final sleep, then the wait fails as not satisfied
//!
//! `wait_for` defaults to 10 s / 1 s, overridable through
//! `JSONWIRE_WAITFOR_TIMEOUT_MS` and `JSONWIRE_WAITFOR_POLL_FREQ_MS`;
//! element waits default to 1 s / 200 ms.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use crate::asserters::{Asserter, ElementAsserter, Verdict};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::session::elements::Strategy;
use crate::session::Session;

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(10_000);
const DEFAULT_WAIT_POLL_FREQ: Duration = Duration::from_millis(1_000);
const DEFAULT_ELEMENT_WAIT_TIMEOUT: Duration = Duration::from_millis(1_000);
const DEFAULT_ELEMENT_WAIT_POLL_FREQ: Duration = Duration::from_millis(200);

const ENV_WAIT_TIMEOUT: &str = "JSONWIRE_WAITFOR_TIMEOUT_MS";
const ENV_WAIT_POLL_FREQ: &str = "JSONWIRE_WAITFOR_POLL_FREQ_MS";

// ============================================================================
// WaitOptions
// ============================================================================

/// Timeout and poll frequency for one wait; unset fields fall back to the
/// wait kind's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitOptions {
    timeout: Option<Duration>,
    poll_freq: Option<Duration>,
}

impl WaitOptions {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn poll_freq(mut self, poll_freq: Duration) -> Self {
        self.poll_freq = Some(poll_freq);
        self
    }

    fn resolve_session(self) -> (Duration, Duration) {
        (
            self.timeout
                .or_else(|| env_duration(ENV_WAIT_TIMEOUT))
                .unwrap_or(DEFAULT_WAIT_TIMEOUT),
            self.poll_freq
                .or_else(|| env_duration(ENV_WAIT_POLL_FREQ))
                .unwrap_or(DEFAULT_WAIT_POLL_FREQ),
        )
    }

    fn resolve_element(self) -> (Duration, Duration) {
        (
            self.timeout.unwrap_or(DEFAULT_ELEMENT_WAIT_TIMEOUT),
            self.poll_freq.unwrap_or(DEFAULT_ELEMENT_WAIT_POLL_FREQ),
        )
    }
}

fn env_duration(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_millis)
}

// ============================================================================
// Engine
// ============================================================================

/// Wait scope, selecting which condition-failure error to raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitScope {
    Session,
    Element,
}

async fn poll_until<T, F, Fut>(
    timeout: Duration,
    poll_freq: Duration,
    scope: WaitScope,
    mut check: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Verdict<T>>>,
{
    let deadline = Instant::now() + timeout;
    let mut last_chance = false;
    loop {
        match check().await {
            Ok(Verdict::Satisfied(value)) => {
                trace!("condition satisfied");
                return Ok(value);
            }
            Ok(Verdict::Unsatisfied) => {}
            Err(err) if err.is_retriable() => {
                trace!(error = %err, "retriable error treated as unsatisfied");
            }
            Err(err) => return Err(err),
        }
        if last_chance {
            debug!(timeout_ms = timeout.as_millis() as u64, "condition never satisfied");
            let timeout_ms = timeout.as_millis() as u64;
            return Err(match scope {
                WaitScope::Session => Error::ConditionNotSatisfied { timeout_ms },
                WaitScope::Element => Error::ElementConditionNotSatisfied { timeout_ms },
            });
        }
        // past the deadline the condition still gets one final poll after
        // the usual sleep
        if Instant::now() > deadline {
            last_chance = true;
        }
        tokio::time::sleep(poll_freq).await;
    }
}

// ============================================================================
// Session Waits
// ============================================================================

impl Session {
    /// Polls a session-level condition until satisfied.
    pub async fn wait_for<A: Asserter>(
        &self,
        asserter: &A,
        options: WaitOptions,
    ) -> Result<A::Output> {
        let (timeout, poll_freq) = options.resolve_session();
        poll_until(timeout, poll_freq, WaitScope::Session, || asserter.poll(self)).await
    }

    /// Polls a locator until some matching element satisfies the
    /// asserter; resolves with the first such element.
    pub async fn wait_for_element<A: ElementAsserter>(
        &self,
        strategy: Strategy,
        value: &str,
        asserter: &A,
        options: WaitOptions,
    ) -> Result<Element> {
        let (timeout, poll_freq) = options.resolve_element();
        poll_until(timeout, poll_freq, WaitScope::Element, || async move {
            for element in self.elements(strategy, value).await? {
                match asserter.poll_element(&element).await {
                    Ok(Verdict::Satisfied(())) => return Ok(Verdict::Satisfied(element)),
                    Ok(Verdict::Unsatisfied) => {}
                    Err(err) if err.is_retriable() => {}
                    Err(err) => return Err(err),
                }
            }
            Ok(Verdict::Unsatisfied)
        })
        .await
    }

    /// Polls a locator until at least one matching element satisfies the
    /// asserter; resolves with every element that did.
    pub async fn wait_for_elements<A: ElementAsserter>(
        &self,
        strategy: Strategy,
        value: &str,
        asserter: &A,
        options: WaitOptions,
    ) -> Result<Vec<Element>> {
        let (timeout, poll_freq) = options.resolve_element();
        poll_until(timeout, poll_freq, WaitScope::Element, || async move {
            let mut satisfied = Vec::new();
            for element in self.elements(strategy, value).await? {
                match asserter.poll_element(&element).await {
                    Ok(Verdict::Satisfied(())) => satisfied.push(element),
                    Ok(Verdict::Unsatisfied) => {}
                    Err(err) if err.is_retriable() => {}
                    Err(err) => return Err(err),
                }
            }
            if satisfied.is_empty() {
                Ok(Verdict::Unsatisfied)
            } else {
                Ok(Verdict::Satisfied(satisfied))
            }
        })
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asserters::IsDisplayed;
    use crate::session::testing::*;

    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    struct SatisfiedOnNth {
        calls: Arc<AtomicU32>,
        nth: u32,
    }

    #[async_trait]
    impl Asserter for SatisfiedOnNth {
        type Output = u32;

        async fn poll(&self, _session: &Session) -> Result<Verdict<u32>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.nth {
                Ok(Verdict::Satisfied(n))
            } else {
                Ok(Verdict::Unsatisfied)
            }
        }
    }

    struct AlwaysRetriableError;

    #[async_trait]
    impl Asserter for AlwaysRetriableError {
        type Output = ();

        async fn poll(&self, _session: &Session) -> Result<Verdict<()>> {
            Err(Error::retriable(Error::transport("flaky")))
        }
    }

    struct FatalError;

    #[async_trait]
    impl Asserter for FatalError {
        type Output = ();

        async fn poll(&self, _session: &Session) -> Result<Verdict<()>> {
            Err(Error::invalid_argument("broken condition"))
        }
    }

    fn fast_options() -> WaitOptions {
        WaitOptions::new()
            .timeout(Duration::from_millis(200))
            .poll_freq(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_wait_for_satisfied_on_third_poll() {
        init_tracing();
        let session = attached_session(MockTransport::new());
        let calls = Arc::new(AtomicU32::new(0));
        let asserter = SatisfiedOnNth {
            calls: calls.clone(),
            nth: 3,
        };

        let value = session.wait_for(&asserter, fast_options()).await.unwrap();
        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_for_times_out_with_last_chance_poll() {
        let session = attached_session(MockTransport::new());
        let calls = Arc::new(AtomicU32::new(0));
        let asserter = SatisfiedOnNth {
            calls: calls.clone(),
            nth: u32::MAX,
        };

        let err = session
            .wait_for(
                &asserter,
                WaitOptions::new()
                    .timeout(Duration::from_millis(30))
                    .poll_freq(Duration::from_millis(20)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConditionNotSatisfied { .. }));
        // at least: initial poll, post-deadline poll, final last-chance poll
        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_retriable_errors_poll_again() {
        let session = attached_session(MockTransport::new());
        let err = session
            .wait_for(&AlwaysRetriableError, fast_options())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConditionNotSatisfied { .. }));
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_immediately() {
        let session = attached_session(MockTransport::new());
        let err = session
            .wait_for(&FatalError, fast_options())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_wait_for_element_resolves_when_displayed() {
        let transport = MockTransport::new();
        // poll 1: nothing; poll 2: found but hidden; poll 3: found and shown
        transport.push_value(json!([]));
        transport.push_value(json!([{"ELEMENT": "e1"}]));
        transport.push_value(json!(false));
        transport.push_value(json!([{"ELEMENT": "e1"}]));
        transport.push_value(json!(true));
        let session = attached_session(transport);

        let element = session
            .wait_for_element(Strategy::Id, "banner", &IsDisplayed, fast_options())
            .await
            .unwrap();
        assert_eq!(element.id(), "e1");
    }

    #[tokio::test]
    async fn test_wait_for_element_failure_is_element_scoped() {
        let transport = MockTransport::new();
        for _ in 0..64 {
            transport.push_value(json!([]));
        }
        let session = attached_session(transport);

        let err = session
            .wait_for_element(
                Strategy::Id,
                "missing",
                &IsDisplayed,
                WaitOptions::new()
                    .timeout(Duration::from_millis(30))
                    .poll_freq(Duration::from_millis(10)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ElementConditionNotSatisfied { .. }));
    }

    #[tokio::test]
    async fn test_wait_for_elements_collects_all_satisfied() {
        let transport = MockTransport::new();
        transport.push_value(json!([{"ELEMENT": "a"}, {"ELEMENT": "b"}]));
        transport.push_value(json!(true));
        transport.push_value(json!(true));
        let session = attached_session(transport);

        let elements = session
            .wait_for_elements(Strategy::CssSelector, ".row", &IsDisplayed, fast_options())
            .await
            .unwrap();
        assert_eq!(elements.len(), 2);
    }
}
