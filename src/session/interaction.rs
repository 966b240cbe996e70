//! Element-scoped getters and actions.
//!
//! These are `pub(crate)` and take a raw element id; the public surface is
//! [`Element`](crate::Element), which forwards here with its own id. The
//! session-level entry points (`text` defaulting to the page body, `keys`
//! typing to the focused element) live here too.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::element::Element;
use crate::error::Result;
use crate::protocol::WireRequest;
use crate::session::elements::Strategy;
use crate::session::{decode, Session};

// ============================================================================
// Rect
// ============================================================================

/// Combined position and size of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// ============================================================================
// Session-Level Entry Points
// ============================================================================

impl Session {
    /// Visible text of an element, or of the page body when `element` is
    /// `None`.
    pub async fn text(&self, element: Option<&Element>) -> Result<String> {
        match element {
            Some(element) => self.element_text(element.id()).await,
            None => {
                let body = self.element(Strategy::TagName, "body").await?;
                self.element_text(body.id()).await
            }
        }
    }

    /// Whether `search` occurs in the visible text of `element` (or the
    /// page body when `None`).
    pub async fn text_present(&self, search: &str, element: Option<&Element>) -> Result<bool> {
        Ok(self.text(element).await?.contains(search))
    }

    /// Sends keystrokes to the focused element.
    pub async fn keys(&self, text: &str) -> Result<()> {
        self.call_simple("keys", WireRequest::post_data("/keys", keys_body(text)))
            .await
    }
}

// ============================================================================
// Element-Scoped Commands
// ============================================================================

impl Session {
    pub(crate) async fn element_attribute(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Option<String>> {
        let encoded = urlencoding::encode(name);
        decode(
            self.call_value(
                "getAttribute",
                WireRequest::get(format!("/element/{id}/attribute/{encoded}")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_property(&self, id: &str, name: &str) -> Result<Value> {
        let encoded = urlencoding::encode(name);
        self.call_value(
            "getProperty",
            WireRequest::get(format!("/element/{id}/property/{encoded}")),
        )
        .await
    }

    pub(crate) async fn element_rect(&self, id: &str) -> Result<Rect> {
        decode(
            self.call_value("getRect", WireRequest::get(format!("/element/{id}/rect")))
                .await?,
        )
    }

    pub(crate) async fn element_computed_css(&self, id: &str, property: &str) -> Result<String> {
        let encoded = urlencoding::encode(property);
        decode(
            self.call_value(
                "getComputedCss",
                WireRequest::get(format!("/element/{id}/css/{encoded}")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_tag_name(&self, id: &str) -> Result<String> {
        decode(
            self.call_value("getTagName", WireRequest::get(format!("/element/{id}/name")))
                .await?,
        )
    }

    pub(crate) async fn element_text(&self, id: &str) -> Result<String> {
        decode(
            self.call_value("text", WireRequest::get(format!("/element/{id}/text")))
                .await?,
        )
    }

    /// The `value` attribute, the conventional way to read form inputs.
    pub(crate) async fn element_value(&self, id: &str) -> Result<Option<String>> {
        self.element_attribute(id, "value").await
    }

    pub(crate) async fn element_click(&self, id: &str) -> Result<()> {
        self.call_simple(
            "clickElement",
            WireRequest::post(format!("/element/{id}/click")),
        )
        .await
    }

    pub(crate) async fn element_type(&self, id: &str, text: &str) -> Result<()> {
        self.call_simple(
            "type",
            WireRequest::post_data(format!("/element/{id}/value"), keys_body(text)),
        )
        .await
    }

    pub(crate) async fn element_clear(&self, id: &str) -> Result<()> {
        self.call_simple("clear", WireRequest::post(format!("/element/{id}/clear")))
            .await
    }

    pub(crate) async fn element_submit(&self, id: &str) -> Result<()> {
        self.call_simple("submit", WireRequest::post(format!("/element/{id}/submit")))
            .await
    }

    pub(crate) async fn element_displayed(&self, id: &str) -> Result<bool> {
        decode(
            self.call_value(
                "isDisplayed",
                WireRequest::get(format!("/element/{id}/displayed")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_enabled(&self, id: &str) -> Result<bool> {
        decode(
            self.call_value(
                "isEnabled",
                WireRequest::get(format!("/element/{id}/enabled")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_selected(&self, id: &str) -> Result<bool> {
        decode(
            self.call_value(
                "isSelected",
                WireRequest::get(format!("/element/{id}/selected")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_size(&self, id: &str) -> Result<crate::session::Size> {
        decode(
            self.call_value("getSize", WireRequest::get(format!("/element/{id}/size")))
                .await?,
        )
    }

    pub(crate) async fn element_location(&self, id: &str) -> Result<crate::session::Position> {
        decode(
            self.call_value(
                "getLocation",
                WireRequest::get(format!("/element/{id}/location")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_location_in_view(
        &self,
        id: &str,
    ) -> Result<crate::session::Position> {
        decode(
            self.call_value(
                "getLocationInView",
                WireRequest::get(format!("/element/{id}/location_in_view")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_equals(&self, id: &str, other: &str) -> Result<bool> {
        decode(
            self.call_value(
                "equalsElement",
                WireRequest::get(format!("/element/{id}/equals/{other}")),
            )
            .await?,
        )
    }

    pub(crate) async fn element_screenshot(&self, id: &str) -> Result<String> {
        decode(
            self.call_value(
                "takeElementScreenshot",
                WireRequest::get(format!("/element/{id}/screenshot")),
            )
            .await?,
        )
    }

    /// Scoped lookup: first descendant of `id` matching the locator.
    pub(crate) async fn element_in(
        &self,
        id: &str,
        strategy: Strategy,
        value: &str,
    ) -> Result<Element> {
        let command = format!("element{}", strategy.display_suffix());
        let result = self
            .call_value(
                &command,
                WireRequest::post_data(
                    format!("/element/{id}/element"),
                    json!({"using": strategy.wire_name(), "value": value}),
                ),
            )
            .await?;
        self.element_from_value(&result)
    }

    /// Scoped lookup: all descendants of `id` matching the locator.
    pub(crate) async fn elements_in(
        &self,
        id: &str,
        strategy: Strategy,
        value: &str,
    ) -> Result<Vec<Element>> {
        let command = format!("elements{}", strategy.display_suffix());
        let result = self
            .call_value(
                &command,
                WireRequest::post_data(
                    format!("/element/{id}/elements"),
                    json!({"using": strategy.wire_name(), "value": value}),
                ),
            )
            .await?;
        self.elements_from_value(&result)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Keystroke body shape: the protocol wants an array of strings.
fn keys_body(text: &str) -> Value {
    json!({"value": [text]})
}

// ============================================================================
// Tests
// ============================================================================
