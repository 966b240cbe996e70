//! JSON Wire Protocol status codes.
//!
//! Status `0` means success; every other code maps to a fixed
//! summary/detail pair used when building protocol errors.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

// ============================================================================
// StatusDescription
// ============================================================================

/// Human-readable description of a wire status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDescription {
    /// The wire status code.
    pub status: i64,
    /// Short summary, e.g. `NoSuchElement`.
    pub summary: &'static str,
    /// Longer detail sentence.
    pub detail: &'static str,
}

// ============================================================================
// Status Table
// ============================================================================

/// The fixed status table from the JSON Wire Protocol specification.
static STATUS_TABLE: &[StatusDescription] = &[
    StatusDescription {
        status: 0,
        summary: "Success",
        detail: "The command executed successfully.",
    },
    StatusDescription {
        status: 6,
        summary: "NoSuchDriver",
        detail: "A session is either terminated or not started.",
    },
    StatusDescription {
        status: 7,
        summary: "NoSuchElement",
        detail: "An element could not be located on the page using the given search parameters.",
    },
    StatusDescription {
        status: 8,
        summary: "NoSuchFrame",
        detail: "A request to switch to a frame could not be satisfied because the frame could not be found.",
    },
    StatusDescription {
        status: 9,
        summary: "UnknownCommand",
        detail: "The requested resource could not be found, or a request was received using an HTTP method that is not supported by the mapped resource.",
    },
    StatusDescription {
        status: 10,
        summary: "StaleElementReference",
        detail: "An element command failed because the referenced element is no longer attached to the DOM.",
    },
    StatusDescription {
        status: 11,
        summary: "ElementNotVisible",
        detail: "An element command could not be completed because the element is not visible on the page.",
    },
    StatusDescription {
        status: 12,
        summary: "InvalidElementState",
        detail: "An element command could not be completed because the element is in an invalid state (e.g. attempting to click a disabled element).",
    },
    StatusDescription {
        status: 13,
        summary: "UnknownError",
        detail: "An unknown server-side error occurred while processing the command.",
    },
    StatusDescription {
        status: 15,
        summary: "ElementIsNotSelectable",
        detail: "An attempt was made to select an element that cannot be selected.",
    },
    StatusDescription {
        status: 17,
        summary: "JavaScriptError",
        detail: "An error occurred while executing user supplied JavaScript.",
    },
    StatusDescription {
        status: 19,
        summary: "XPathLookupError",
        detail: "An error occurred while searching for an element by XPath.",
    },
    StatusDescription {
        status: 21,
        summary: "Timeout",
        detail: "An operation did not complete before its timeout expired.",
    },
    StatusDescription {
        status: 23,
        summary: "NoSuchWindow",
        detail: "A request to switch to a different window could not be satisfied because the window could not be found.",
    },
    StatusDescription {
        status: 24,
        summary: "InvalidCookieDomain",
        detail: "An illegal attempt was made to set a cookie under a different domain than the current page.",
    },
    StatusDescription {
        status: 25,
        summary: "UnableToSetCookie",
        detail: "A request to set a cookie's value could not be satisfied.",
    },
    StatusDescription {
        status: 26,
        summary: "UnexpectedAlertOpen",
        detail: "A modal dialog was open, blocking this operation.",
    },
    StatusDescription {
        status: 27,
        summary: "NoAlertOpenError",
        detail: "An attempt was made to operate on a modal dialog when one was not open.",
    },
    StatusDescription {
        status: 28,
        summary: "ScriptTimeout",
        detail: "A script did not complete before its timeout expired.",
    },
    StatusDescription {
        status: 29,
        summary: "InvalidElementCoordinates",
        detail: "The coordinates provided to an interactions operation are invalid.",
    },
    StatusDescription {
        status: 30,
        summary: "IMENotAvailable",
        detail: "IME was not available.",
    },
    StatusDescription {
        status: 31,
        summary: "IMEEngineActivationFailed",
        detail: "An IME engine could not be started.",
    },
    StatusDescription {
        status: 32,
        summary: "InvalidSelector",
        detail: "Argument was an invalid selector (e.g. XPath/CSS).",
    },
    StatusDescription {
        status: 33,
        summary: "SessionNotCreatedException",
        detail: "A new session could not be created.",
    },
    StatusDescription {
        status: 34,
        summary: "MoveTargetOutOfBounds",
        detail: "Target provided for a move action is out of bounds.",
    },
];

/// Lookup index over [`STATUS_TABLE`].
static STATUS_INDEX: LazyLock<FxHashMap<i64, &'static StatusDescription>> = LazyLock::new(|| {
    STATUS_TABLE
        .iter()
        .map(|desc| (desc.status, desc))
        .collect()
});

// ============================================================================
// Lookup
// ============================================================================

/// Looks up the description for a wire status code.
///
/// Returns `None` for codes outside the fixed table; protocol errors for
/// unknown codes still carry the raw status.
#[inline]
#[must_use]
pub fn status_description(status: i64) -> Option<&'static StatusDescription> {
    STATUS_INDEX.get(&status).copied()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_code() {
        let desc = status_description(0).unwrap();
        assert_eq!(desc.summary, "Success");
    }

    #[test]
    fn test_no_such_element() {
        let desc = status_description(7).unwrap();
        assert_eq!(desc.summary, "NoSuchElement");
        assert!(desc.detail.contains("could not be located"));
    }

    #[test]
    fn test_unknown_code() {
        assert!(status_description(99).is_none());
        assert!(status_description(-1).is_none());
    }

    #[test]
    fn test_table_has_no_duplicates() {
        assert_eq!(STATUS_INDEX.len(), STATUS_TABLE.len());
    }
}
