//! Desired-capabilities map.
//!
//! Capabilities are an open JSON object; this wrapper keeps insertion
//! ergonomic and owns the default entries merged into `init` requests.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Capabilities
// ============================================================================

/// An open key/value capability object sent with `init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(Map<String, Value>);

impl Capabilities {
    /// Creates an empty capability set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entries merged into every `init` unless suppressed:
    /// `version: ""`, `javascriptEnabled: true`, `platform: "ANY"`.
    #[must_use]
    pub fn standard_defaults() -> Self {
        Self::new()
            .with("version", "")
            .with("javascriptEnabled", true)
            .with("platform", "ANY")
    }

    /// Convenience constructor naming a browser.
    #[must_use]
    pub fn browser(name: &str) -> Self {
        Self::new().with("browserName", name)
    }

    /// Adds an entry, builder-style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Adds or replaces an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Reads an entry.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies in entries from `defaults` for keys not already present.
    ///
    /// Explicit entries always win over defaults.
    pub fn merge_missing(&mut self, defaults: &Capabilities) {
        for (key, value) in &defaults.0 {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    /// Consumes the set into a JSON value for the wire.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Capabilities> for Value {
    fn from(caps: Capabilities) -> Self {
        caps.into_value()
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
    fn test_standard_defaults() {
        let caps = Capabilities::standard_defaults();
        assert_eq!(caps.get("version"), Some(&json!("")));
        assert_eq!(caps.get("javascriptEnabled"), Some(&json!(true)));
        assert_eq!(caps.get("platform"), Some(&json!("ANY")));
    }

    #[test]
    fn test_merge_missing_keeps_explicit() {
        let mut caps = Capabilities::browser("chrome").with("platform", "LINUX");
        caps.merge_missing(&Capabilities::standard_defaults());
        assert_eq!(caps.get("platform"), Some(&json!("LINUX")));
        assert_eq!(caps.get("browserName"), Some(&json!("chrome")));
        assert_eq!(caps.get("javascriptEnabled"), Some(&json!(true)));
    }

    #[test]
    fn test_serializes_transparent() {
        let caps = Capabilities::browser("firefox");
        assert_eq!(
            serde_json::to_value(&caps).unwrap(),
            json!({"browserName": "firefox"})
        );
    }
}
