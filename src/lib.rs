//! JSON Wire Protocol client - async browser automation over HTTP.
//!
//! This library drives a remote browser through the legacy JSON Wire
//! Protocol: Selenium 2 servers, grids, and Appium-style endpoints.
//!
//! # Architecture
//!
//! The client is layered; protocol knowledge never leaks upward:
//!
//! - **Transport**: endpoint URLs, HTTP exchange, network-failure retries
//! - **Protocol**: the `{sessionId, status, value}` envelope, the fixed
//!   status table, response normalization
//! - **Session**: the command catalog as async methods on [`Session`]
//! - **Element**: opaque remote handles re-exposing element commands
//! - **Adapters**: polling ([`Session::wait_for`]), gesture composition
//!   ([`TouchAction`]), chained call style ([`Chain`])
//!
//! # Quick Start
//!
//! ```no_run
//! use jsonwire_client::{Capabilities, Endpoint, Session, Strategy};
//!
//! #[tokio::main]
//! async fn main() -> jsonwire_client::Result<()> {
//!     let session = Session::new(Endpoint::parse("http://127.0.0.1:4444/wd/hub")?)?;
//!     session.init(Capabilities::browser("firefox")).await?;
//!
//!     session.get("https://example.com/login").await?;
//!     let field = session.element(Strategy::Css, "#user").await?;
//!     field.type_text("admin").await?;
//!     field.submit().await?;
//!
//!     session.quit().await
//! }
//! ```
//!
//! The same sequence, chained:
//!
//! ```no_run
//! # use jsonwire_client::{Endpoint, Session};
//! # async fn run(session: Session) -> jsonwire_client::Result<()> {
//! session
//!     .chain()
//!     .get("https://example.com/login")
//!     .element_by_css("#user")
//!     .type_text("admin")
//!     .submit()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`session`] | Session handle and the full command catalog |
//! | [`element`] | Remote element handles |
//! | [`asserters`] | Conditions for the polling engine |
//! | [`actions`] | Touch-gesture composition |
//! | [`chain`] | Chained and callback call styles |
//! | [`config`] | HTTP configuration and retry policy |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Wire envelope and status table (internal shapes) |
//! | [`transport`] | Endpoint and HTTP transport (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Touch-gesture composition: [`TouchAction`], [`MultiAction`].
pub mod actions;

/// Conditions for the polling engine.
///
/// Built-ins cover the common cases; implement [`Asserter`] or
/// [`ElementAsserter`] for custom conditions.
pub mod asserters;

/// Chained and callback presentations over the canonical async methods.
pub mod chain;

/// HTTP configuration: timeout, retry policy, base URL, proxy.
pub mod config;

/// Remote element handles.
pub mod element;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Wire envelope, request descriptors, and the status table.
pub mod protocol;

/// Session handle and the command catalog.
pub mod session;

/// Endpoint and HTTP transport layer.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Session types
pub use session::{
    Capabilities, CommandEvent, Cookie, FrameRef, GeoLocation, LogEntry, MouseButton,
    Orientation, Position, Rect, Session, SessionBuilder, Size, Strategy, WaitOptions,
};

// Element handle
pub use element::Element;

// Adapters
pub use actions::{GestureOptions, MultiAction, TouchAction};
pub use asserters::{
    Asserter, ElementAsserter, IsDisplayed, IsNotDisplayed, JsCondition, NonEmptyText,
    TextInclude, Verdict,
};
pub use chain::{with_callback, Chain, ElementChain};

// Configuration
pub use config::{HttpConfig, HttpOverrides, Retries};
pub use transport::Endpoint;

// Error types
pub use error::{Error, Result};
