//! Script execution and the forwarding bridge.
//!
//! `execute`/`execute_async` run JavaScript in the page. The forwarding
//! bridge (`next` and its wrappers) tunnels commands the wire protocol has
//! no path for to a cooperating server extension at `POST /next`; the
//! client treats the payload as opaque.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{json, Value};

use crate::error::Result;
use crate::protocol::WireRequest;
use crate::session::Session;

impl Session {
    // ------------------------------------------------------------------
    // Script execution
    // ------------------------------------------------------------------

    /// Executes synchronous JavaScript in the page; `args` are available
    /// as `arguments`.
    ///
    /// Values shaped like `{ELEMENT: id}` in the result can be turned into
    /// handles with [`Session::element_result`] /
    /// [`Session::elements_result`].
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.call_value(
            "execute",
            WireRequest::post_data("/execute", json!({"script": script, "args": args})),
        )
        .await
    }

    /// Executes JavaScript that settles by calling the injected callback
    /// (the last entry of `arguments`).
    pub async fn execute_async(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        self.call_value(
            "executeAsync",
            WireRequest::post_data("/execute_async", json!({"script": script, "args": args})),
        )
        .await
    }

    /// Evaluates an expression in the page and returns its value.
    pub async fn eval_expr(&self, expression: &str) -> Result<Value> {
        let script = format!("return {expression};");
        let value = self
            .call_value(
                "eval",
                WireRequest::post_data("/execute", json!({"script": script, "args": []})),
            )
            .await?;
        Ok(value)
    }

    /// Interprets a script result as a single element reference.
    pub fn element_result(&self, value: &Value) -> Result<crate::Element> {
        self.element_from_value(value)
    }

    /// Interprets a script result as an array of element references.
    pub fn elements_result(&self, value: &Value) -> Result<Vec<crate::Element>> {
        self.elements_from_value(value)
    }

    // ------------------------------------------------------------------
    // Forwarding bridge
    // ------------------------------------------------------------------

    /// Forwards an arbitrary command to the server-side bridge.
    ///
    /// The protocol does not interpret `method` or `args`; whatever the
    /// bridge returns comes back as the normalized value.
    pub async fn next(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        self.call_value(
            "next",
            WireRequest::post_data("/next", json!({"method": method, "args": args})),
        )
        .await
    }

    /// Bridge wrapper: invoke `func` on the page object.
    pub async fn page(&self, func: &str, args: Vec<Value>) -> Result<Value> {
        self.next("page", vec![json!({"func": func, "args": args})])
            .await
    }

    /// Bridge wrapper: invoke `func` on the most recent popup page.
    pub async fn page_popup(&self, func: &str, args: Vec<Value>) -> Result<Value> {
        self.next("pagePopup", vec![json!({"func": func, "args": args})])
            .await
    }

    /// Bridge wrapper: invoke `func` on the browser object.
    pub async fn browser(&self, func: &str, args: Vec<Value>) -> Result<Value> {
        self.next("browser", vec![json!({"func": func, "args": args})])
            .await
    }

    /// Bridge wrapper: dispatch a mouse action.
    pub async fn mouse(&self, action: &str, args: Vec<Value>) -> Result<Value> {
        self.next("mouse", vec![json!({"type": action, "args": args})])
            .await
    }

    /// Bridge wrapper: dispatch a keyboard action.
    pub async fn keyboard(&self, action: &str, args: Vec<Value>) -> Result<Value> {
        self.next("keyboard", vec![json!({"type": action, "args": args})])
            .await
    }

    /// Bridge wrapper: drive the native file chooser.
    pub async fn file_chooser(&self, args: Vec<Value>) -> Result<Value> {
        self.next("fileChooser", args).await
    }

    /// Bridge wrapper: query element status.
    pub async fn element_status(&self, args: Vec<Value>) -> Result<Value> {
        self.next("elementStatus", args).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::session::testing::*;

    use serde_json::json;

    #[tokio::test]
    async fn test_execute_body_shape() {
        let transport = MockTransport::new();
        transport.push_value(json!(3));
        let session = attached_session(transport.clone());

        let value = session
            .execute("return arguments[0] + arguments[1];", vec![json!(1), json!(2)])
            .await
            .unwrap();
        assert_eq!(value, json!(3));
        assert_eq!(
            transport.last_request().body,
            Some(json!({
                "script": "return arguments[0] + arguments[1];",
                "args": [1, 2]
            }))
        );
    }

    #[tokio::test]
    async fn test_eval_expr_wraps_in_return() {
        let transport = MockTransport::new();
        transport.push_value(json!("Title"));
        let session = attached_session(transport.clone());

        session.eval_expr("document.title").await.unwrap();
        assert_eq!(
            transport.last_request().body.unwrap()["script"],
            json!("return document.title;")
        );
    }

    #[tokio::test]
    async fn test_execute_result_as_element() {
        let transport = MockTransport::new();
        transport.push_value(json!({"ELEMENT": "node-9"}));
        let session = attached_session(transport);

        let value = session
            .execute("return document.body;", Vec::new())
            .await
            .unwrap();
        let element = session.element_result(&value).unwrap();
        assert_eq!(element.id(), "node-9");
    }

    #[tokio::test]
    async fn test_next_bridge_payload() {
        let transport = MockTransport::new();
        transport.push_value(json!(null));
        let session = attached_session(transport.clone());

        session
            .mouse("click", vec![json!({"x": 10, "y": 20})])
            .await
            .unwrap();

        let request = transport.last_request();
        assert!(request.url.as_str().ends_with("/session/sess-1/next"));
        assert_eq!(
            request.body,
            Some(json!({
                "method": "mouse",
                "args": [{"type": "click", "args": [{"x": 10, "y": 20}]}]
            }))
        );
    }
}
