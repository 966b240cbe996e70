//! Wire protocol types (internal).
//!
//! The JSON Wire Protocol exchanges HTTP requests carrying JSON bodies and
//! responses wrapped in a `{sessionId, status, value}` envelope. This module
//! owns the envelope parsing strategies, the fixed status-code table, and
//! the request descriptor handed to the transport.

pub mod envelope;
pub mod request;
pub mod status;

pub use envelope::{WireEnvelope, is_driver_exception, parse_simple, parse_with_data};
pub use request::{CommandPath, WireRequest};
pub use status::{StatusDescription, status_description};
