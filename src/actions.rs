//! Touch-gesture composition.
//!
//! A [`TouchAction`] accumulates gestures client-side, in order, and only
//! reaches the wire when handed to
//! [`Session::perform_touch_action`](crate::Session::perform_touch_action).
//! A [`MultiAction`] aggregates several touch actions (one per finger)
//! plus an optional owning element.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::element::Element;

// ============================================================================
// GestureOptions
// ============================================================================

/// Typed options attached to a gesture.
///
/// Only fields that were set are serialized; an element reference becomes
/// its raw id under the `element` key.
#[derive(Debug, Clone, Default)]
pub struct GestureOptions {
    x: Option<f64>,
    y: Option<f64>,
    element: Option<String>,
    duration: Option<Duration>,
    count: Option<u32>,
}

impl GestureOptions {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets absolute coordinates (or offsets within the element, when
    /// one is also set).
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Targets an element.
    #[must_use]
    pub fn on_element(mut self, element: &Element) -> Self {
        self.element = Some(element.id().to_string());
        self
    }

    /// Gesture duration (long press).
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Tap count.
    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    fn to_wire(&self) -> Value {
        let mut options = Map::new();
        if let Some(element) = &self.element {
            options.insert("element".to_string(), json!(element));
        }
        if let Some(x) = self.x {
            options.insert("x".to_string(), json!(x));
        }
        if let Some(y) = self.y {
            options.insert("y".to_string(), json!(y));
        }
        if let Some(duration) = self.duration {
            options.insert("duration".to_string(), json!(duration.as_millis() as u64));
        }
        if let Some(count) = self.count {
            options.insert("count".to_string(), json!(count));
        }
        Value::Object(options)
    }
}

// ============================================================================
// TouchAction
// ============================================================================

#[derive(Debug, Clone)]
struct Gesture {
    action: &'static str,
    options: Value,
}

/// An ordered, client-side list of gestures for one touch point.
#[derive(Debug, Clone, Default)]
pub struct TouchAction {
    gestures: Vec<Gesture>,
}

impl TouchAction {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, action: &'static str, options: Value) -> Self {
        self.gestures.push(Gesture { action, options });
        self
    }

    /// Presses down at the target.
    #[must_use]
    pub fn press(self, options: GestureOptions) -> Self {
        self.push("press", options.to_wire())
    }

    /// Presses and holds at the target.
    #[must_use]
    pub fn long_press(self, options: GestureOptions) -> Self {
        self.push("longPress", options.to_wire())
    }

    /// Taps the target.
    #[must_use]
    pub fn tap(self, options: GestureOptions) -> Self {
        self.push("tap", options.to_wire())
    }

    /// Moves the touch point to the target.
    #[must_use]
    pub fn move_to(self, options: GestureOptions) -> Self {
        self.push("moveTo", options.to_wire())
    }

    /// Pauses between gestures.
    #[must_use]
    pub fn wait(self, duration: Duration) -> Self {
        self.push("wait", json!({"ms": duration.as_millis() as u64}))
    }

    /// Lifts the touch point.
    #[must_use]
    pub fn release(self) -> Self {
        self.push("release", json!({}))
    }

    /// Cancels the whole gesture sequence server-side.
    #[must_use]
    pub fn cancel(self) -> Self {
        self.push("cancel", json!({}))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    /// Wire shape: `[{action, options}, ...]` in insertion order.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        Value::Array(
            self.gestures
                .iter()
                .map(|g| json!({"action": g.action, "options": g.options}))
                .collect(),
        )
    }
}

// ============================================================================
// MultiAction
// ============================================================================

/// Several touch actions performed together, optionally owned by an
/// element whose id is attached at perform time.
#[derive(Debug, Clone, Default)]
pub struct MultiAction {
    actions: Vec<TouchAction>,
    element: Option<String>,
}

impl MultiAction {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes the whole multi-action to an element.
    #[must_use]
    pub fn on_element(mut self, element: &Element) -> Self {
        self.element = Some(element.id().to_string());
        self
    }

    /// Adds one finger's gesture sequence.
    #[must_use]
    pub fn add(mut self, action: TouchAction) -> Self {
        self.actions.push(action);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Wire body for `perform`: `{elementId?, actions: [[...], ...]}`.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        let actions: Vec<Value> = self.actions.iter().map(TouchAction::to_wire).collect();
        match &self.element {
            Some(id) => json!({"elementId": id, "actions": actions}),
            None => json!({"actions": actions}),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
