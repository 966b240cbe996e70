//! HTTP transport layer (internal).
//!
//! This module owns endpoint/URL construction and the actual HTTP exchange,
//! including the transport-failure retry policy. Protocol semantics live one
//! layer up; the transport only moves bytes and classifies network
//! failures.

pub mod endpoint;
pub mod http;

pub use endpoint::Endpoint;
pub use http::{HttpTransport, RawResponse, Transport};
