//! Remote element handles.
//!
//! An [`Element`] is an opaque remote id plus the session that produced
//! it. Handles are immutable and cheap to clone; all behavior forwards to
//! the owning session with the id injected. A handle stays valid only as
//! long as the remote session that minted it — using it against another
//! session is not detected client-side and will fail remotely.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::Result;
use crate::session::elements::Strategy;
use crate::session::{Position, Rect, Session, Size};

// ============================================================================
// Element
// ============================================================================

struct ElementInner {
    session: Session,
    id: String,
}

/// Handle to a remote DOM element.
#[derive(Clone)]
pub struct Element {
    inner: Arc<ElementInner>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element").field("id", &self.inner.id).finish()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element[{}]", self.inner.id)
    }
}

/// Client-side identity: same remote id. For the remote notion of
/// equality use [`Element::equals`].
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}
impl Eq for Element {}

impl Element {
    pub(crate) fn new(session: Session, id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ElementInner {
                session,
                id: id.into(),
            }),
        }
    }

    /// Builds a handle from a `{ELEMENT: id}` wire value.
    ///
    /// The remote id is opaque; drivers send it as a string or a number.
    pub(crate) fn from_wire(session: &Session, value: &Value) -> Option<Self> {
        let id = match value.get("ELEMENT")? {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };
        Some(Self::new(session.clone(), id))
    }

    /// The raw remote id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The owning session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// The `{ELEMENT: id}` shape used when embedding this handle in a
    /// request body.
    #[must_use]
    pub fn wire_ref(&self) -> Value {
        json!({"ELEMENT": self.inner.id})
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    /// Attribute value; `None` when the attribute is absent.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner.session.element_attribute(&self.inner.id, name).await
    }

    /// DOM property value, as JSON.
    pub async fn property(&self, name: &str) -> Result<Value> {
        self.inner.session.element_property(&self.inner.id, name).await
    }

    /// Position and size in one call.
    pub async fn rect(&self) -> Result<Rect> {
        self.inner.session.element_rect(&self.inner.id).await
    }

    /// Computed CSS value for a property.
    pub async fn computed_css(&self, property: &str) -> Result<String> {
        self.inner
            .session
            .element_computed_css(&self.inner.id, property)
            .await
    }

    /// Lower-case tag name.
    pub async fn tag_name(&self) -> Result<String> {
        self.inner.session.element_tag_name(&self.inner.id).await
    }

    /// Visible text.
    pub async fn text(&self) -> Result<String> {
        self.inner.session.element_text(&self.inner.id).await
    }

    /// The `value` attribute (form inputs).
    pub async fn value(&self) -> Result<Option<String>> {
        self.inner.session.element_value(&self.inner.id).await
    }

    pub async fn displayed(&self) -> Result<bool> {
        self.inner.session.element_displayed(&self.inner.id).await
    }

    pub async fn enabled(&self) -> Result<bool> {
        self.inner.session.element_enabled(&self.inner.id).await
    }

    pub async fn selected(&self) -> Result<bool> {
        self.inner.session.element_selected(&self.inner.id).await
    }

    pub async fn size(&self) -> Result<Size> {
        self.inner.session.element_size(&self.inner.id).await
    }

    pub async fn location(&self) -> Result<Position> {
        self.inner.session.element_location(&self.inner.id).await
    }

    /// Location after scrolling the element into view.
    pub async fn location_in_view(&self) -> Result<Position> {
        self.inner
            .session
            .element_location_in_view(&self.inner.id)
            .await
    }

    /// Remote equality with another handle.
    pub async fn equals(&self, other: &Element) -> Result<bool> {
        self.inner
            .session
            .element_equals(&self.inner.id, other.id())
            .await
    }

    /// Base64-encoded PNG of just this element.
    pub async fn screenshot(&self) -> Result<String> {
        self.inner.session.element_screenshot(&self.inner.id).await
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub async fn click(&self) -> Result<()> {
        self.inner.session.element_click(&self.inner.id).await
    }

    /// Types text into the element.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        self.inner.session.element_type(&self.inner.id, text).await
    }

    /// Clears a text input.
    pub async fn clear(&self) -> Result<()> {
        self.inner.session.element_clear(&self.inner.id).await
    }

    /// Submits the enclosing form.
    pub async fn submit(&self) -> Result<()> {
        self.inner.session.element_submit(&self.inner.id).await
    }

    // ------------------------------------------------------------------
    // Scoped lookup
    // ------------------------------------------------------------------

    /// First descendant matching the locator.
    pub async fn element(&self, strategy: Strategy, value: &str) -> Result<Element> {
        self.inner
            .session
            .element_in(&self.inner.id, strategy, value)
            .await
    }

    /// All descendants matching the locator.
    pub async fn elements(&self, strategy: Strategy, value: &str) -> Result<Vec<Element>> {
        self.inner
            .session
            .elements_in(&self.inner.id, strategy, value)
            .await
    }
}

// ============================================================================
// Scoped By-Strategy Families
// ============================================================================

macro_rules! scoped_by_strategy {
    ($strategy:expr => $element:ident, $elements:ident) => {
        impl Element {
            pub async fn $element(&self, value: &str) -> Result<Element> {
                self.element($strategy, value).await
            }

            pub async fn $elements(&self, value: &str) -> Result<Vec<Element>> {
                self.elements($strategy, value).await
            }
        }
    };
}

scoped_by_strategy!(Strategy::ClassName => element_by_class_name, elements_by_class_name);
scoped_by_strategy!(Strategy::CssSelector => element_by_css_selector, elements_by_css_selector);
scoped_by_strategy!(Strategy::Id => element_by_id, elements_by_id);
scoped_by_strategy!(Strategy::Name => element_by_name, elements_by_name);
scoped_by_strategy!(Strategy::LinkText => element_by_link_text, elements_by_link_text);
scoped_by_strategy!(Strategy::PartialLinkText => element_by_partial_link_text, elements_by_partial_link_text);
scoped_by_strategy!(Strategy::TagName => element_by_tag_name, elements_by_tag_name);
scoped_by_strategy!(Strategy::XPath => element_by_xpath, elements_by_xpath);
scoped_by_strategy!(Strategy::Css => element_by_css, elements_by_css);
scoped_by_strategy!(Strategy::IosUiAutomation => element_by_ios_ui_automation, elements_by_ios_ui_automation);
scoped_by_strategy!(Strategy::AndroidUiAutomator => element_by_android_ui_automator, elements_by_android_ui_automator);
scoped_by_strategy!(Strategy::AccessibilityId => element_by_accessibility_id, elements_by_accessibility_id);

// ============================================================================
// Tests
// ============================================================================
