//! Moodle Portal Session Library
//!
//! This library automates authenticated interaction with a single
//! Moodle-based e-learning portal: it logs in with credentials, keeps the
//! resulting session alive, and fetches authenticated pages with transparent
//! re-login when the session expires.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Login token and sesskey extraction from portal markup
//! - [`auth`] - Cookie jar scoped to the portal origin
//! - [`transport`] - Authenticated HTTP transport (cookies, redirect control)
//! - [`session`] - Session lifecycle: login, validity probe, refresh, fetch

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod parser;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use auth::SessionJar;
pub use parser::{ParseError, extract_login_token, extract_sesskey};
pub use session::{
    Credentials, DEFAULT_FETCH_RETRIES, DEFAULT_REFRESH_INTERVAL, LoginOutcome, RecordError,
    SessionError, SessionManager, SessionRecord, SessionState,
};
pub use transport::{PortalClient, PortalResponse, Redirects, TransportError};
