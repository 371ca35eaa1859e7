//! Error types for the session lifecycle.

use thiserror::Error;

use crate::parser::ParseError;
use crate::transport::TransportError;

/// Errors raised while acquiring a portal session.
///
/// These never escape the session manager boundary: `login()` converts them
/// into a failed [`LoginOutcome`](super::LoginOutcome), and the content-fetch
/// path degrades to an absent result when its retry budget runs out.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The login page did not yield the expected markup.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The login page itself came back with an error status.
    #[error("login page fetch failed (HTTP {status})")]
    LoginPageUnavailable {
        /// The HTTP status returned for the login page.
        status: u16,
    },

    /// The credential exchange was not answered with a redirect.
    ///
    /// The portal signals a successful login with a redirect status; a 200
    /// re-rendering the login form is a rejection.
    #[error("authentication rejected by portal (HTTP {status})")]
    AuthenticationRejected {
        /// The HTTP status returned for the credential exchange.
        status: u16,
    },
}
