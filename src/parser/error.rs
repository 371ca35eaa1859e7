//! Error types for portal markup extraction.

use thiserror::Error;

/// Errors that can occur while extracting values from portal pages.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The login page markup does not contain the anti-forgery token control.
    ///
    /// Happens when the page structure changed, or when the request was
    /// redirected away from the login form because the client is already
    /// authenticated. A login attempt without this token always fails
    /// server-side, so the absence must propagate as a hard failure.
    #[error("login token not found in page markup")]
    TokenNotFound,

    /// No `sesskey` value embedded in the page's inline scripts.
    #[error("sesskey not found in page markup")]
    SesskeyNotFound,
}
