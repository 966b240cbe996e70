//! Window, frame, and context management.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::element::Element;
use crate::error::Result;
use crate::protocol::WireRequest;
use crate::session::{decode, Session};

// ============================================================================
// Geometry
// ============================================================================

/// A width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

/// An x/y pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

// ============================================================================
// FrameRef
// ============================================================================

/// Target of a frame switch.
#[derive(Debug, Clone)]
pub enum FrameRef {
    /// The top-level browsing context.
    Top,
    /// Frame by zero-based index.
    Index(u32),
    /// Frame by `name` or `id` attribute.
    Name(String),
    /// A previously located frame element.
    Element(Element),
}

impl FrameRef {
    fn to_wire(&self) -> Value {
        match self {
            Self::Top => Value::Null,
            Self::Index(index) => json!(index),
            Self::Name(name) => json!(name),
            Self::Element(element) => element.wire_ref(),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

impl Session {
    /// Switches focus to the window with the given handle or name.
    pub async fn window(&self, handle_or_name: &str) -> Result<()> {
        self.call_simple(
            "window",
            WireRequest::post_data("/window", json!({"name": handle_or_name})),
        )
        .await
    }

    /// The handle of the focused window.
    pub async fn window_handle(&self) -> Result<String> {
        decode(
            self.call_value("windowHandle", WireRequest::get("/window_handle"))
                .await?,
        )
    }

    /// Handles of all open windows.
    pub async fn window_handles(&self) -> Result<Vec<String>> {
        decode(
            self.call_value("windowHandles", WireRequest::get("/window_handles"))
                .await?,
        )
    }

    /// Closes the focused window.
    pub async fn close(&self) -> Result<()> {
        self.call_simple("close", WireRequest::delete("/window"))
            .await
    }

    /// Outer size of a window; `None` targets the focused window.
    pub async fn window_size(&self, handle: Option<&str>) -> Result<Size> {
        let handle = handle.unwrap_or("current");
        decode(
            self.call_value(
                "windowSize",
                WireRequest::get(format!("/window/{handle}/size")),
            )
            .await?,
        )
    }

    /// Resizes a window; `None` targets the focused window.
    pub async fn set_window_size(&self, size: Size, handle: Option<&str>) -> Result<()> {
        let handle = handle.unwrap_or("current");
        self.call_simple(
            "setWindowSize",
            WireRequest::post_data(format!("/window/{handle}/size"), json!(size)),
        )
        .await
    }

    /// Screen position of a window; `None` targets the focused window.
    pub async fn window_position(&self, handle: Option<&str>) -> Result<Position> {
        let handle = handle.unwrap_or("current");
        decode(
            self.call_value(
                "windowPosition",
                WireRequest::get(format!("/window/{handle}/position")),
            )
            .await?,
        )
    }

    /// Moves a window; `None` targets the focused window.
    pub async fn set_window_position(
        &self,
        position: Position,
        handle: Option<&str>,
    ) -> Result<()> {
        let handle = handle.unwrap_or("current");
        self.call_simple(
            "setWindowPosition",
            WireRequest::post_data(format!("/window/{handle}/position"), json!(position)),
        )
        .await
    }

    /// Maximizes a window; `None` targets the focused window.
    pub async fn maximize(&self, handle: Option<&str>) -> Result<()> {
        let handle = handle.unwrap_or("current");
        self.call_simple(
            "maximize",
            WireRequest::post(format!("/window/{handle}/maximize")),
        )
        .await
    }

    /// Switches frame focus.
    pub async fn frame(&self, frame: FrameRef) -> Result<()> {
        self.call_simple(
            "frame",
            WireRequest::post_data("/frame", json!({"id": frame.to_wire()})),
        )
        .await
    }

    /// Opens a new window via script, optionally named.
    pub async fn new_window(&self, url: &str, name: Option<&str>) -> Result<()> {
        let name = name.unwrap_or("");
        self.execute(
            "window.open(arguments[0], arguments[1]);",
            vec![json!(url), json!(name)],
        )
        .await?;
        Ok(())
    }

    /// The `window.name` of the focused window.
    pub async fn window_name(&self) -> Result<String> {
        decode(self.execute("return window.name;", Vec::new()).await?)
    }

    /// Available contexts (native-app automation).
    pub async fn contexts(&self) -> Result<Vec<String>> {
        decode(
            self.call_value("contexts", WireRequest::get("/contexts"))
                .await?,
        )
    }

    /// The currently focused context.
    pub async fn current_context(&self) -> Result<String> {
        decode(
            self.call_value("currentContext", WireRequest::get("/context"))
                .await?,
        )
    }

    /// Switches to the named context.
    pub async fn context(&self, name: &str) -> Result<()> {
        self.call_simple(
            "context",
            WireRequest::post_data("/context", json!({"name": name})),
        )
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::*;

    #[tokio::test]
    async fn test_window_size_defaults_to_current() {
        let transport = MockTransport::new();
        transport.push_value(json!({"width": 1280, "height": 800}));
        let session = attached_session(transport.clone());

        let size = session.window_size(None).await.unwrap();
        assert_eq!(
            size,
            Size {
                width: 1280,
                height: 800
            }
        );
        assert!(transport
            .last_request()
            .url
            .as_str()
            .ends_with("/window/current/size"));
    }

    #[tokio::test]
    async fn test_frame_top_sends_null() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());

        session.frame(FrameRef::Top).await.unwrap();
        assert_eq!(transport.last_request().body, Some(json!({"id": null})));
    }

    #[tokio::test]
    async fn test_frame_by_element_sends_wire_ref() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());
        let element = session.new_element("frame-7");

        session.frame(FrameRef::Element(element)).await.unwrap();
        assert_eq!(
            transport.last_request().body,
            Some(json!({"id": {"ELEMENT": "frame-7"}}))
        );
    }

    #[tokio::test]
    async fn test_window_switch_body() {
        let transport = MockTransport::new();
        transport.push_simple_ok();
        let session = attached_session(transport.clone());

        session.window("popup").await.unwrap();
        assert_eq!(transport.last_request().body, Some(json!({"name": "popup"})));
    }
}
