//! Element lookup and locator strategies.
//!
//! All lookup goes through two locator-agnostic operations (`element`,
//! `elements`); everything else — the `*_or_null` / `*_if_exists` /
//! `has_*` variants and the per-strategy families — derives from those
//! plus the strategy table. No per-strategy protocol logic exists.

// ============================================================================
// Imports
// ============================================================================

use serde_json::json;

use crate::asserters::ElementAsserter;
use crate::element::Element;
use crate::error::Result;
use crate::protocol::WireRequest;
use crate::session::wait::WaitOptions;
use crate::session::Session;

// ============================================================================
// Strategy
// ============================================================================

/// A locator strategy from the fixed protocol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    ClassName,
    CssSelector,
    Id,
    Name,
    LinkText,
    PartialLinkText,
    TagName,
    XPath,
    /// Alias accepted for convenience; identical on the wire to
    /// [`Strategy::CssSelector`].
    Css,
    IosUiAutomation,
    AndroidUiAutomator,
    AccessibilityId,
}

impl Strategy {
    /// The strategy's own spelling, used to derive display names.
    #[must_use]
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::ClassName => "class name",
            Self::CssSelector => "css selector",
            Self::Id => "id",
            Self::Name => "name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::TagName => "tag name",
            Self::XPath => "xpath",
            Self::Css => "css",
            Self::IosUiAutomation => "-ios uiautomation",
            Self::AndroidUiAutomator => "-android uiautomator",
            Self::AccessibilityId => "accessibility id",
        }
    }

    /// The `using` value sent on the wire. Only the `css` alias differs
    /// from [`canonical_name`](Self::canonical_name).
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Css => "css selector",
            other => other.canonical_name(),
        }
    }

    /// Camel-case display suffix for observability, e.g. `ByXPath`,
    /// `ByPartialLinkText`.
    ///
    /// Derived at runtime: title-case each word of the canonical name
    /// after `By`, with `xpath` special-cased to `XPath`.
    #[must_use]
    pub fn display_suffix(self) -> String {
        let mut suffix = String::from("By");
        for word in self.canonical_name().split_whitespace() {
            let word = word.trim_start_matches('-');
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                suffix.push(first.to_ascii_uppercase());
                suffix.extend(chars);
            }
        }
        suffix.replace("Xpath", "XPath")
    }
}

// ============================================================================
// Locator-Agnostic Lookup
// ============================================================================

impl Session {
    /// Finds the first element matching the locator; absence is an error.
    pub async fn element(&self, strategy: Strategy, value: &str) -> Result<Element> {
        let command = format!("element{}", strategy.display_suffix());
        let result = self
            .call_value(
                &command,
                WireRequest::post_data(
                    "/element",
                    json!({"using": strategy.wire_name(), "value": value}),
                ),
            )
            .await?;
        self.element_from_value(&result)
    }

    /// Finds all elements matching the locator; no match is an empty list.
    pub async fn elements(&self, strategy: Strategy, value: &str) -> Result<Vec<Element>> {
        let command = format!("elements{}", strategy.display_suffix());
        let result = self
            .call_value(
                &command,
                WireRequest::post_data(
                    "/elements",
                    json!({"using": strategy.wire_name(), "value": value}),
                ),
            )
            .await?;
        self.elements_from_value(&result)
    }

    /// First match, or `None` when nothing matches.
    pub async fn element_or_null(
        &self,
        strategy: Strategy,
        value: &str,
    ) -> Result<Option<Element>> {
        Ok(self.elements(strategy, value).await?.into_iter().next())
    }

    /// First match, or `None` when nothing matches. Kept alongside
    /// [`element_or_null`](Self::element_or_null) for catalog parity; the
    /// two are indistinguishable here.
    pub async fn element_if_exists(
        &self,
        strategy: Strategy,
        value: &str,
    ) -> Result<Option<Element>> {
        self.element_or_null(strategy, value).await
    }

    /// Whether at least one element matches the locator.
    pub async fn has_element(&self, strategy: Strategy, value: &str) -> Result<bool> {
        Ok(!self.elements(strategy, value).await?.is_empty())
    }

    /// The element with keyboard focus.
    pub async fn active(&self) -> Result<Element> {
        let result = self
            .call_value("active", WireRequest::post("/element/active"))
            .await?;
        self.element_from_value(&result)
    }
}

// ============================================================================
// By-Strategy Families
// ============================================================================

macro_rules! by_strategy {
    ($(#[$meta:meta])* $strategy:path =>
        $element:ident, $elements:ident, $or_null:ident, $if_exists:ident,
        $has:ident, $wait_el:ident, $wait_els:ident
    ) => {
        impl Session {
            $(#[$meta])*
            pub async fn $element(&self, value: &str) -> Result<Element> {
                self.element($strategy, value).await
            }

            pub async fn $elements(&self, value: &str) -> Result<Vec<Element>> {
                self.elements($strategy, value).await
            }

            pub async fn $or_null(&self, value: &str) -> Result<Option<Element>> {
                self.element_or_null($strategy, value).await
            }

            pub async fn $if_exists(&self, value: &str) -> Result<Option<Element>> {
                self.element_if_exists($strategy, value).await
            }

            pub async fn $has(&self, value: &str) -> Result<bool> {
                self.has_element($strategy, value).await
            }

            pub async fn $wait_el<A: ElementAsserter>(
                &self,
                value: &str,
                asserter: &A,
                options: WaitOptions,
            ) -> Result<Element> {
                self.wait_for_element($strategy, value, asserter, options).await
            }

            pub async fn $wait_els<A: ElementAsserter>(
                &self,
                value: &str,
                asserter: &A,
                options: WaitOptions,
            ) -> Result<Vec<Element>> {
                self.wait_for_elements($strategy, value, asserter, options).await
            }
        }
    };
}

by_strategy!(
    /// Lookup by the `class` attribute.
    Strategy::ClassName =>
    element_by_class_name, elements_by_class_name, element_by_class_name_or_null,
    element_by_class_name_if_exists, has_element_by_class_name,
    wait_for_element_by_class_name, wait_for_elements_by_class_name
);
by_strategy!(
    /// Lookup by CSS selector.
    Strategy::CssSelector =>
    element_by_css_selector, elements_by_css_selector, element_by_css_selector_or_null,
    element_by_css_selector_if_exists, has_element_by_css_selector,
    wait_for_element_by_css_selector, wait_for_elements_by_css_selector
);
by_strategy!(
    /// Lookup by the `id` attribute.
    Strategy::Id =>
    element_by_id, elements_by_id, element_by_id_or_null,
    element_by_id_if_exists, has_element_by_id,
    wait_for_element_by_id, wait_for_elements_by_id
);
by_strategy!(
    /// Lookup by the `name` attribute.
    Strategy::Name =>
    element_by_name, elements_by_name, element_by_name_or_null,
    element_by_name_if_exists, has_element_by_name,
    wait_for_element_by_name, wait_for_elements_by_name
);
by_strategy!(
    /// Lookup by exact anchor text.
    Strategy::LinkText =>
    element_by_link_text, elements_by_link_text, element_by_link_text_or_null,
    element_by_link_text_if_exists, has_element_by_link_text,
    wait_for_element_by_link_text, wait_for_elements_by_link_text
);
by_strategy!(
    /// Lookup by anchor text substring.
    Strategy::PartialLinkText =>
    element_by_partial_link_text, elements_by_partial_link_text,
    element_by_partial_link_text_or_null, element_by_partial_link_text_if_exists,
    has_element_by_partial_link_text, wait_for_element_by_partial_link_text,
    wait_for_elements_by_partial_link_text
);
by_strategy!(
    /// Lookup by tag name.
    Strategy::TagName =>
    element_by_tag_name, elements_by_tag_name, element_by_tag_name_or_null,
    element_by_tag_name_if_exists, has_element_by_tag_name,
    wait_for_element_by_tag_name, wait_for_elements_by_tag_name
);
by_strategy!(
    /// Lookup by XPath expression.
    Strategy::XPath =>
    element_by_xpath, elements_by_xpath, element_by_xpath_or_null,
    element_by_xpath_if_exists, has_element_by_xpath,
    wait_for_element_by_xpath, wait_for_elements_by_xpath
);
by_strategy!(
    /// Lookup by CSS selector (`css` alias).
    Strategy::Css =>
    element_by_css, elements_by_css, element_by_css_or_null,
    element_by_css_if_exists, has_element_by_css,
    wait_for_element_by_css, wait_for_elements_by_css
);
by_strategy!(
    /// Lookup by iOS UIAutomation expression.
    Strategy::IosUiAutomation =>
    element_by_ios_ui_automation, elements_by_ios_ui_automation,
    element_by_ios_ui_automation_or_null, element_by_ios_ui_automation_if_exists,
    has_element_by_ios_ui_automation, wait_for_element_by_ios_ui_automation,
    wait_for_elements_by_ios_ui_automation
);
by_strategy!(
    /// Lookup by Android UiAutomator expression.
    Strategy::AndroidUiAutomator =>
    element_by_android_ui_automator, elements_by_android_ui_automator,
    element_by_android_ui_automator_or_null, element_by_android_ui_automator_if_exists,
    has_element_by_android_ui_automator, wait_for_element_by_android_ui_automator,
    wait_for_elements_by_android_ui_automator
);
by_strategy!(
    /// Lookup by accessibility id.
    Strategy::AccessibilityId =>
    element_by_accessibility_id, elements_by_accessibility_id,
    element_by_accessibility_id_or_null, element_by_accessibility_id_if_exists,
    has_element_by_accessibility_id, wait_for_element_by_accessibility_id,
    wait_for_elements_by_accessibility_id
);

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;

    use serde_json::json;

    #[test]
    fn test_wire_names() {
        assert_eq!(Strategy::Css.wire_name(), "css selector");
        assert_eq!(Strategy::CssSelector.wire_name(), "css selector");
        assert_eq!(Strategy::ClassName.wire_name(), "class name");
        assert_eq!(Strategy::XPath.wire_name(), "xpath");
        assert_eq!(Strategy::IosUiAutomation.wire_name(), "-ios uiautomation");
        assert_eq!(
            Strategy::AndroidUiAutomator.wire_name(),
            "-android uiautomator"
        );
        assert_eq!(Strategy::AccessibilityId.wire_name(), "accessibility id");
    }

    #[test]
    fn test_display_suffixes() {
        assert_eq!(Strategy::XPath.display_suffix(), "ByXPath");
        assert_eq!(Strategy::ClassName.display_suffix(), "ByClassName");
        assert_eq!(Strategy::Css.display_suffix(), "ByCss");
        assert_eq!(
            Strategy::PartialLinkText.display_suffix(),
            "ByPartialLinkText"
        );
        assert_eq!(Strategy::IosUiAutomation.display_suffix(), "ByIosUiautomation");
    }

    #[tokio::test]
    async fn test_element_sends_using_value() {
        let transport = MockTransport::new();
        transport.push_value(json!({"ELEMENT": "node-1"}));
        let session = attached_session(transport.clone());

        let element = session.element_by_xpath("//div[@id='x']").await.unwrap();
        assert_eq!(element.id(), "node-1");

        let request = transport.last_request();
        assert!(request.url.as_str().ends_with("/session/sess-1/element"));
        assert_eq!(
            request.body,
            Some(json!({"using": "xpath", "value": "//div[@id='x']"}))
        );
    }

    #[tokio::test]
    async fn test_element_lookup_event_uses_camel_name() {
        use crate::session::CommandEvent;
        use parking_lot::Mutex;
        use std::sync::Arc;

        let transport = MockTransport::new();
        transport.push_value(json!({"ELEMENT": "node-1"}));
        let session = attached_session(transport);
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        session.on_command(move |event| {
            if let CommandEvent::Call { command, .. } = event {
                sink.lock().push(command.clone());
            }
        });

        session.element_by_xpath("//a").await.unwrap();
        assert_eq!(*seen.lock(), vec!["elementByXPath"]);
    }

    #[tokio::test]
    async fn test_elements_empty_result() {
        let transport = MockTransport::new();
        transport.push_value(json!([]));
        let session = attached_session(transport);
        let found = session.elements_by_css(".missing").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_element_or_null_absent() {
        let transport = MockTransport::new();
        transport.push_value(json!([]));
        let session = attached_session(transport);
        assert!(session
            .element_by_id_or_null("nope")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_element_if_exists_present() {
        let transport = MockTransport::new();
        transport.push_value(json!([{"ELEMENT": "a"}, {"ELEMENT": "b"}]));
        let session = attached_session(transport);
        let found = session.element_by_name_if_exists("field").await.unwrap();
        assert_eq!(found.unwrap().id(), "a");
    }

    #[tokio::test]
    async fn test_has_element() {
        let transport = MockTransport::new();
        transport.push_value(json!([{"ELEMENT": "a"}]));
        let session = attached_session(transport);
        assert!(session.has_element_by_link_text("More").await.unwrap());
    }

    #[tokio::test]
    async fn test_css_alias_maps_to_css_selector_on_wire() {
        let transport = MockTransport::new();
        transport.push_value(json!({"ELEMENT": "n"}));
        let session = attached_session(transport.clone());

        session.element_by_css("#main").await.unwrap();
        assert_eq!(
            transport.last_request().body.unwrap()["using"],
            json!("css selector")
        );
    }
}
