//! Condition asserters for the polling engine.
//!
//! An asserter checks a condition once; the engine in
//! [`Session::wait_for`](crate::Session::wait_for) and friends drives it
//! until it is satisfied or the timeout runs out. Returning
//! `Err(Error::retriable(..))` counts as "not satisfied yet" instead of
//! aborting the wait.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::element::Element;
use crate::error::Result;
use crate::session::Session;

// ============================================================================
// Verdict
// ============================================================================

/// Outcome of one condition poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    /// The condition holds; the wait resolves with this value.
    Satisfied(T),
    /// Not yet; the engine sleeps and polls again.
    Unsatisfied,
}

// ============================================================================
// Traits
// ============================================================================

/// A session-level condition.
#[async_trait]
pub trait Asserter: Send + Sync {
    type Output: Send;

    /// Checks the condition once.
    async fn poll(&self, session: &Session) -> Result<Verdict<Self::Output>>;
}

/// A per-element condition, applied to each lookup candidate in turn.
#[async_trait]
pub trait ElementAsserter: Send + Sync {
    /// Checks the condition once against one element.
    async fn poll_element(&self, element: &Element) -> Result<Verdict<()>>;
}

// ============================================================================
// Built-In Asserters
// ============================================================================

/// Satisfied when a JavaScript expression evaluates truthy; resolves with
/// the evaluated value.
#[derive(Debug, Clone)]
pub struct JsCondition {
    expression: String,
}

impl JsCondition {
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

#[async_trait]
impl Asserter for JsCondition {
    type Output = Value;

    async fn poll(&self, session: &Session) -> Result<Verdict<Value>> {
        let value = session.eval_expr(&self.expression).await?;
        if is_truthy(&value) {
            Ok(Verdict::Satisfied(value))
        } else {
            Ok(Verdict::Unsatisfied)
        }
    }
}

/// Satisfied when the element's visible text is non-empty after trimming.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyText;

#[async_trait]
impl ElementAsserter for NonEmptyText {
    async fn poll_element(&self, element: &Element) -> Result<Verdict<()>> {
        let text = element.text().await?;
        if text.trim().is_empty() {
            Ok(Verdict::Unsatisfied)
        } else {
            Ok(Verdict::Satisfied(()))
        }
    }
}

/// Satisfied when the element's visible text contains a substring.
#[derive(Debug, Clone)]
pub struct TextInclude {
    needle: String,
}

impl TextInclude {
    #[must_use]
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

#[async_trait]
impl ElementAsserter for TextInclude {
    async fn poll_element(&self, element: &Element) -> Result<Verdict<()>> {
        if element.text().await?.contains(&self.needle) {
            Ok(Verdict::Satisfied(()))
        } else {
            Ok(Verdict::Unsatisfied)
        }
    }
}

/// Satisfied when the element is displayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsDisplayed;

#[async_trait]
impl ElementAsserter for IsDisplayed {
    async fn poll_element(&self, element: &Element) -> Result<Verdict<()>> {
        if element.displayed().await? {
            Ok(Verdict::Satisfied(()))
        } else {
            Ok(Verdict::Unsatisfied)
        }
    }
}

/// Satisfied when the element is not displayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNotDisplayed;

#[async_trait]
impl ElementAsserter for IsNotDisplayed {
    async fn poll_element(&self, element: &Element) -> Result<Verdict<()>> {
        if element.displayed().await? {
            Ok(Verdict::Unsatisfied)
        } else {
            Ok(Verdict::Satisfied(()))
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// JavaScript truthiness over JSON values.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
