//! Call-style adaptation.
//!
//! The canonical command surface is the async methods on
//! [`Session`]/[`Element`]; the returned future is the promise
//! presentation. This module adds the other two presentations without any
//! protocol knowledge of its own:
//!
//! - [`with_callback`]: runs any command future on the runtime and
//!   delivers its result to a callback.
//! - [`Chain`]/[`ElementChain`]: queue catalog methods fluently and settle
//!   the whole sequence with one `.await`; element-valued steps switch the
//!   chain into element scope.
//!
//! Catalog methods reach the chain by mechanical forwarding: one macro per
//! argument shape plus the locator-strategy table shared with the session.
//! Value-returning commands run for their effect on the chain; read the
//! value through the canonical async method instead.

// ============================================================================
// Imports
// ============================================================================

use std::future::{Future, IntoFuture};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::actions::{MultiAction, TouchAction};
use crate::asserters::{Asserter, ElementAsserter};
use crate::element::Element;
use crate::error::Result;
use crate::session::{
    Cookie, FrameRef, GeoLocation, MouseButton, Orientation, Position, Session, Size, Strategy,
    WaitOptions,
};

// ============================================================================
// Callback Presentation
// ============================================================================

/// Spawns a command future and hands its result to `callback`.
///
/// The returned handle can be awaited to join the spawned task; dropping
/// it detaches the task.
pub fn with_callback<T, F, C>(future: F, callback: C) -> tokio::task::JoinHandle<()>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
    C: FnOnce(Result<T>) + Send + 'static,
{
    tokio::spawn(async move { callback(future.await) })
}

// ============================================================================
// Chain
// ============================================================================

/// A queued sequence of session commands.
///
/// Nothing runs until the chain is awaited; the first failure
/// short-circuits the rest.
#[must_use = "a chain does nothing until awaited"]
pub struct Chain {
    future: BoxFuture<'static, Result<Session>>,
}

impl Chain {
    /// Starts a chain on a session.
    pub fn new(session: Session) -> Self {
        Self {
            future: Box::pin(async move { Ok(session) }),
        }
    }

    fn step<F, Fut>(self, f: F) -> Chain
    where
        F: FnOnce(Session) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Session>> + Send + 'static,
    {
        Chain {
            future: Box::pin(async move {
                let session = self.future.await?;
                f(session).await
            }),
        }
    }
}

impl IntoFuture for Chain {
    type Output = Result<Session>;
    type IntoFuture = BoxFuture<'static, Result<Session>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

// ============================================================================
// Forwarding Macros
// ============================================================================

/// Forwards no-argument session commands onto the chain.
macro_rules! chain_forward {
    ($($name:ident),* $(,)?) => {
        impl Chain {
            $(
                pub fn $name(self) -> Chain {
                    self.step(|session| async move {
                        session.$name().await?;
                        Ok(session)
                    })
                }
            )*
        }
    };
}

/// Forwards session commands taking one string argument onto the chain.
macro_rules! chain_forward_str {
    ($($name:ident),* $(,)?) => {
        impl Chain {
            $(
                pub fn $name(self, value: impl Into<String>) -> Chain {
                    let value = value.into();
                    self.step(move |session| async move {
                        session.$name(&value).await?;
                        Ok(session)
                    })
                }
            )*
        }
    };
}

/// Forwards session commands taking one owned argument onto the chain.
macro_rules! chain_forward_owned {
    ($($name:ident($ty:ty)),* $(,)?) => {
        impl Chain {
            $(
                pub fn $name(self, value: $ty) -> Chain {
                    self.step(move |session| async move {
                        session.$name(value).await?;
                        Ok(session)
                    })
                }
            )*
        }
    };
}

chain_forward!(
    back,
    forward,
    refresh,
    close,
    accept_alert,
    dismiss_alert,
    delete_all_cookies,
    double_click,
);

chain_forward_str!(get, window, keys, context, alert_keys, delete_cookie);

chain_forward_owned!(
    frame(FrameRef),
    set_cookie(Cookie),
    set_orientation(Orientation),
    set_geo_location(GeoLocation),
    click(MouseButton),
    button_down(MouseButton),
    button_up(MouseButton),
    set_implicit_wait_timeout(Duration),
    set_async_script_timeout(Duration),
    set_page_load_timeout(Duration),
);

// ============================================================================
// Hand-Shaped Session Steps
// ============================================================================

impl Chain {
    /// Pauses the chain client-side.
    pub fn sleep(self, duration: Duration) -> Chain {
        self.step(move |session| async move {
            session.sleep(duration).await;
            Ok(session)
        })
    }

    pub fn quit(self) -> Chain {
        self.step(|session| async move {
            session.quit().await?;
            Ok(session)
        })
    }

    /// Runs a script for its effect; the result is discarded.
    pub fn execute(self, script: impl Into<String>, args: Vec<Value>) -> Chain {
        let script = script.into();
        self.step(move |session| async move {
            session.execute(&script, args).await?;
            Ok(session)
        })
    }

    /// Maximizes the focused window.
    pub fn maximize(self) -> Chain {
        self.step(|session| async move {
            session.maximize(None).await?;
            Ok(session)
        })
    }

    /// Resizes the focused window.
    pub fn set_window_size(self, size: Size) -> Chain {
        self.step(move |session| async move {
            session.set_window_size(size, None).await?;
            Ok(session)
        })
    }

    /// Moves the focused window.
    pub fn set_window_position(self, position: Position) -> Chain {
        self.step(move |session| async move {
            session.set_window_position(position, None).await?;
            Ok(session)
        })
    }

    pub fn flick(self, xspeed: i64, yspeed: i64) -> Chain {
        self.step(move |session| async move {
            session.flick(xspeed, yspeed).await?;
            Ok(session)
        })
    }

    /// Performs a gesture sequence; the driver's value is discarded.
    pub fn perform_touch_action(self, action: TouchAction) -> Chain {
        self.step(move |session| async move {
            session.perform_touch_action(&action).await?;
            Ok(session)
        })
    }

    /// Performs a multi-finger sequence; the driver's value is discarded.
    pub fn perform_multi_action(self, action: MultiAction) -> Chain {
        self.step(move |session| async move {
            session.perform_multi_action(&action).await?;
            Ok(session)
        })
    }

    /// Polls a session-level condition; its output is discarded.
    pub fn wait_for<A>(self, asserter: A, options: WaitOptions) -> Chain
    where
        A: Asserter + 'static,
    {
        self.step(move |session| async move {
            session.wait_for(&asserter, options).await?;
            Ok(session)
        })
    }

    /// Locates an element, switching the chain into element scope.
    pub fn element(self, strategy: Strategy, value: impl Into<String>) -> ElementChain {
        let value = value.into();
        ElementChain {
            future: Box::pin(async move {
                let session = self.future.await?;
                let element = session.element(strategy, &value).await?;
                Ok((session, element))
            }),
        }
    }

    /// Polls a locator until an element satisfies the asserter, switching
    /// the chain into element scope.
    pub fn wait_for_element<A>(
        self,
        strategy: Strategy,
        value: impl Into<String>,
        asserter: A,
        options: WaitOptions,
    ) -> ElementChain
    where
        A: ElementAsserter + 'static,
    {
        let value = value.into();
        ElementChain {
            future: Box::pin(async move {
                let session = self.future.await?;
                let element = session
                    .wait_for_element(strategy, &value, &asserter, options)
                    .await?;
                Ok((session, element))
            }),
        }
    }
}

// ============================================================================
// ElementChain
// ============================================================================

/// A chain whose current subject is a located element.
///
/// Awaiting it yields the element after every queued step ran.
#[must_use = "a chain does nothing until awaited"]
pub struct ElementChain {
    future: BoxFuture<'static, Result<(Session, Element)>>,
}

impl ElementChain {
    fn step<F, Fut>(self, f: F) -> ElementChain
    where
        F: FnOnce(Element) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        ElementChain {
            future: Box::pin(async move {
                let (session, element) = self.future.await?;
                f(element.clone()).await?;
                Ok((session, element))
            }),
        }
    }

    pub fn click(self) -> ElementChain {
        self.step(|element| async move { element.click().await })
    }

    pub fn clear(self) -> ElementChain {
        self.step(|element| async move { element.clear().await })
    }

    pub fn submit(self) -> ElementChain {
        self.step(|element| async move { element.submit().await })
    }

    pub fn type_text(self, text: impl Into<String>) -> ElementChain {
        let text = text.into();
        self.step(move |element| async move { element.type_text(&text).await })
    }

    /// Single taps the subject element.
    pub fn tap(self) -> ElementChain {
        self.step(|element| async move { element.session().tap_element(&element).await })
    }

    /// Flicks starting on the subject element.
    pub fn flick(self, xoffset: i64, yoffset: i64, speed: i64) -> ElementChain {
        self.step(move |element| async move {
            element
                .session()
                .flick_element(&element, xoffset, yoffset, speed)
                .await
        })
    }

    /// Moves the pointer to the subject element, optionally with offsets.
    pub fn move_to(self, xoffset: Option<i64>, yoffset: Option<i64>) -> ElementChain {
        self.step(move |element| async move {
            element
                .session()
                .move_to(Some(&element), xoffset, yoffset)
                .await
        })
    }

    /// Locates a descendant, making it the chain's new subject.
    pub fn element(self, strategy: Strategy, value: impl Into<String>) -> ElementChain {
        let value = value.into();
        ElementChain {
            future: Box::pin(async move {
                let (session, element) = self.future.await?;
                let child = element.element(strategy, &value).await?;
                Ok((session, child))
            }),
        }
    }

    /// Drops the element subject, returning to session scope.
    pub fn done(self) -> Chain {
        Chain {
            future: Box::pin(async move {
                let (session, _element) = self.future.await?;
                Ok(session)
            }),
        }
    }
}

impl IntoFuture for ElementChain {
    type Output = Result<Element>;
    type IntoFuture = BoxFuture<'static, Result<Element>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let (_session, element) = self.future.await?;
            Ok(element)
        })
    }
}

// ============================================================================
// By-Strategy Families
// ============================================================================

/// Re-exposes the locator-strategy table on both chain scopes: session
/// lookup, polled lookup, and scoped descendant lookup.
macro_rules! chain_by_strategy {
    ($($strategy:path => $element:ident, $wait_el:ident),* $(,)?) => {
        impl Chain {
            $(
                pub fn $element(self, value: impl Into<String>) -> ElementChain {
                    self.element($strategy, value)
                }

                pub fn $wait_el<A>(
                    self,
                    value: impl Into<String>,
                    asserter: A,
                    options: WaitOptions,
                ) -> ElementChain
                where
                    A: ElementAsserter + 'static,
                {
                    self.wait_for_element($strategy, value, asserter, options)
                }
            )*
        }

        impl ElementChain {
            $(
                pub fn $element(self, value: impl Into<String>) -> ElementChain {
                    self.element($strategy, value)
                }
            )*
        }
    };
}

chain_by_strategy!(
    Strategy::ClassName => element_by_class_name, wait_for_element_by_class_name,
    Strategy::CssSelector => element_by_css_selector, wait_for_element_by_css_selector,
    Strategy::Id => element_by_id, wait_for_element_by_id,
    Strategy::Name => element_by_name, wait_for_element_by_name,
    Strategy::LinkText => element_by_link_text, wait_for_element_by_link_text,
    Strategy::PartialLinkText => element_by_partial_link_text, wait_for_element_by_partial_link_text,
    Strategy::TagName => element_by_tag_name, wait_for_element_by_tag_name,
    Strategy::XPath => element_by_xpath, wait_for_element_by_xpath,
    Strategy::Css => element_by_css, wait_for_element_by_css,
    Strategy::IosUiAutomation => element_by_ios_ui_automation, wait_for_element_by_ios_ui_automation,
    Strategy::AndroidUiAutomator => element_by_android_ui_automator, wait_for_element_by_android_ui_automator,
    Strategy::AccessibilityId => element_by_accessibility_id, wait_for_element_by_accessibility_id,
);

// ============================================================================
// Session Entry Point
// ============================================================================

impl Session {
    /// Starts a chained command sequence on this session.
    pub fn chain(&self) -> Chain {
        Chain::new(self.clone())
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

    use serde_json::json;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_chain_runs_steps_in_order() {
        let transport = MockTransport::new();
        transport.push_simple_ok(); // get
        transport.push_value(json!({"ELEMENT": "field-1"})); // element
        transport.push_simple_ok(); // type
        transport.push_simple_ok(); // submit
        let session = attached_session(transport.clone());

        let element = assert_ok!(
            session
                .chain()
                .get("https://example.com/login")
                .element_by_css("#user")
                .type_text("admin")
                .submit()
                .await
        );

        assert_eq!(element.id(), "field-1");
        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert!(requests[0].url.as_str().ends_with("/url"));
        assert!(requests[1].url.as_str().ends_with("/element"));
        assert!(requests[2].url.as_str().ends_with("/element/field-1/value"));
        assert!(requests[3].url.as_str().ends_with("/element/field-1/submit"));
    }

    #[tokio::test]
    async fn test_chain_nothing_runs_until_awaited() {
        let transport = MockTransport::new();
        let session = attached_session(transport.clone());

        let chain = session.chain().get("https://example.com").back();
        assert!(transport.requests().is_empty());
        drop(chain);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_chain_short_circuits_on_failure() {
        let transport = MockTransport::new();
        transport.push_status(13, "boom"); // get fails
        let session = attached_session(transport.clone());

        let result = session
            .chain()
            .get("https://example.com")
            .element_by_id("x")
            .click()
            .await;

        assert!(result.is_err());
        // only the failing step hit the wire
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_done_returns_to_session_scope() {
        let transport = MockTransport::new();
        transport.push_value(json!({"ELEMENT": "e"}));
        transport.push_simple_ok(); // click
        transport.push_simple_ok(); // back
        let session = attached_session(transport.clone());

        session
            .chain()
            .element_by_id("e")
            .click()
            .done()
            .back()
            .await
            .unwrap();
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_chain_state_and_script_steps() {
        let transport = MockTransport::new();
        transport.push_value(json!(null)); // execute
        transport.push_simple_ok(); // frame
        transport.push_simple_ok(); // set_cookie
        let session = attached_session(transport.clone());

        session
            .chain()
            .execute("window.scrollTo(0, 0);", Vec::new())
            .frame(FrameRef::Top)
            .set_cookie(Cookie::new("token", "abc"))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].url.as_str().ends_with("/execute"));
        assert_eq!(requests[1].body, Some(json!({"id": null})));
        assert!(requests[2].url.as_str().ends_with("/cookie"));
    }

    #[tokio::test]
    async fn test_chain_by_strategy_family_uses_wire_name() {
        let transport = MockTransport::new();
        transport.push_value(json!({"ELEMENT": "f"}));
        transport.push_simple_ok(); // click
        let session = attached_session(transport.clone());

        session
            .chain()
            .element_by_name("user")
            .click()
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"using": "name", "value": "user"}))
        );
    }

    #[tokio::test]
    async fn test_chain_scoped_descendant_lookup() {
        let transport = MockTransport::new();
        transport.push_value(json!({"ELEMENT": "parent"}));
        transport.push_value(json!({"ELEMENT": "child"}));
        transport.push_simple_ok(); // click
        let session = attached_session(transport.clone());

        let element = session
            .chain()
            .element_by_id("form")
            .element_by_css(".submit")
            .click()
            .await
            .unwrap();

        assert_eq!(element.id(), "child");
        let requests = transport.requests();
        assert!(requests[1]
            .url
            .as_str()
            .ends_with("/element/parent/element"));
        assert!(requests[2].url.as_str().ends_with("/element/child/click"));
    }

    #[tokio::test]
    async fn test_chain_wait_for_element_then_act() {
        let transport = MockTransport::new();
        // poll 1: absent; poll 2: found and shown
        transport.push_value(json!([]));
        transport.push_value(json!([{"ELEMENT": "banner"}]));
        transport.push_value(json!(true)); // displayed
        transport.push_simple_ok(); // click
        let session = attached_session(transport.clone());

        let element = session
            .chain()
            .wait_for_element_by_id(
                "banner",
                IsDisplayed,
                WaitOptions::new()
                    .timeout(Duration::from_millis(200))
                    .poll_freq(Duration::from_millis(10)),
            )
            .click()
            .await
            .unwrap();

        assert_eq!(element.id(), "banner");
        assert!(transport
            .last_request()
            .url
            .as_str()
            .ends_with("/element/banner/click"));
    }

    #[tokio::test]
    async fn test_chain_touch_perform() {
        use crate::actions::GestureOptions;

        let transport = MockTransport::new();
        transport.push_value(json!(null));
        let session = attached_session(transport.clone());

        session
            .chain()
            .perform_touch_action(
                TouchAction::new()
                    .press(GestureOptions::new().at(5.0, 5.0))
                    .release(),
            )
            .await
            .unwrap();

        assert!(transport
            .last_request()
            .url
            .as_str()
            .ends_with("/touch/perform"));
    }

    #[tokio::test]
    async fn test_with_callback_delivers_result() {
        let transport = MockTransport::new();
        transport.push_value(json!("The Title"));
        let session = attached_session(transport);

        let (tx, rx) = tokio::sync::oneshot::channel();
        let fut = {
            let session = session.clone();
            async move { session.title().await }
        };
        with_callback(fut, move |result| {
            tx.send(result).ok();
        });

        let result = rx.await.unwrap();
        assert_eq!(result.unwrap(), "The Title");
    }
}
