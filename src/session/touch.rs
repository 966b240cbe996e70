//! Touch, flick, and pointer commands.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{json, Map, Value};

use crate::actions::{MultiAction, TouchAction};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::protocol::WireRequest;
use crate::session::Session;

// ============================================================================
// MouseButton
// ============================================================================

/// Pointer button, numbered as the protocol numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl MouseButton {
    #[inline]
    #[must_use]
    pub fn wire_code(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

impl Session {
    /// Performs an accumulated touch-gesture sequence.
    ///
    /// An empty sequence is a client-usage error and never reaches the
    /// wire.
    pub async fn perform_touch_action(&self, action: &TouchAction) -> Result<Value> {
        if action.is_empty() {
            return Err(Error::invalid_argument("touch action has no gestures"));
        }
        self.call_value(
            "performTouchAction",
            WireRequest::post_data("/touch/perform", json!({"actions": action.to_wire()})),
        )
        .await
    }

    /// Performs a multi-finger gesture sequence.
    pub async fn perform_multi_action(&self, action: &MultiAction) -> Result<Value> {
        if action.is_empty() {
            return Err(Error::invalid_argument("multi action has no touch actions"));
        }
        self.call_value(
            "performMultiAction",
            WireRequest::post_data("/touch/multi/perform", action.to_wire()),
        )
        .await
    }

    /// Flicks the screen at the given per-axis speeds.
    pub async fn flick(&self, xspeed: i64, yspeed: i64) -> Result<()> {
        self.call_simple(
            "flick",
            WireRequest::post_data(
                "/touch/flick",
                json!({"xspeed": xspeed, "yspeed": yspeed}),
            ),
        )
        .await
    }

    /// Flicks starting on an element, toward an offset, at a speed.
    pub async fn flick_element(
        &self,
        element: &Element,
        xoffset: i64,
        yoffset: i64,
        speed: i64,
    ) -> Result<()> {
        self.call_simple(
            "flickElement",
            WireRequest::post_data(
                "/touch/flick",
                json!({
                    "element": element.id(),
                    "xoffset": xoffset,
                    "yoffset": yoffset,
                    "speed": speed,
                }),
            ),
        )
        .await
    }

    /// Single taps an element.
    pub async fn tap_element(&self, element: &Element) -> Result<()> {
        self.call_simple(
            "tapElement",
            WireRequest::post_data("/touch/click", json!({"element": element.id()})),
        )
        .await
    }

    /// Scrolls from an optional element anchor by the given offsets.
    pub async fn scroll(
        &self,
        element: Option<&Element>,
        xoffset: i64,
        yoffset: i64,
    ) -> Result<()> {
        let mut body = Map::new();
        if let Some(element) = element {
            body.insert("element".to_string(), json!(element.id()));
        }
        body.insert("xoffset".to_string(), json!(xoffset));
        body.insert("yoffset".to_string(), json!(yoffset));
        self.call_simple(
            "touchScroll",
            WireRequest::post_data("/touch/scroll", Value::Object(body)),
        )
        .await
    }

    /// Moves the pointer to an element, to coordinates, or both (offsets
    /// within the element).
    pub async fn move_to(
        &self,
        element: Option<&Element>,
        xoffset: Option<i64>,
        yoffset: Option<i64>,
    ) -> Result<()> {
        let mut body = Map::new();
        if let Some(element) = element {
            body.insert("element".to_string(), json!(element.id()));
        }
        if let Some(x) = xoffset {
            body.insert("xoffset".to_string(), json!(x));
        }
        if let Some(y) = yoffset {
            body.insert("yoffset".to_string(), json!(y));
        }
        self.call_simple("moveTo", WireRequest::post_data("/moveto", Value::Object(body)))
            .await
    }

    /// Presses a pointer button at the current location.
    pub async fn button_down(&self, button: MouseButton) -> Result<()> {
        self.call_simple(
            "buttonDown",
            WireRequest::post_data("/buttondown", json!({"button": button.wire_code()})),
        )
        .await
    }

    /// Releases a pointer button at the current location.
    pub async fn button_up(&self, button: MouseButton) -> Result<()> {
        self.call_simple(
            "buttonUp",
            WireRequest::post_data("/buttonup", json!({"button": button.wire_code()})),
        )
        .await
    }

    /// Clicks at the current pointer location.
    pub async fn click(&self, button: MouseButton) -> Result<()> {
        self.call_simple(
            "click",
            WireRequest::post_data("/click", json!({"button": button.wire_code()})),
        )
        .await
    }

    /// Double-clicks at the current pointer location.
    pub async fn double_click(&self) -> Result<()> {
        self.call_simple("doubleclick", WireRequest::post("/doubleclick"))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
