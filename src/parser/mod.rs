//! Extraction helpers for portal page markup.
//!
//! Moodle embeds two per-session values in its pages: a single-use
//! `logintoken` hidden input on the login form, and a `sesskey` value inside
//! inline script configuration on authenticated pages. Both are extracted
//! with static regexes. All functions here are pure and hold no shared state.

mod error;

pub use error::ParseError;

use std::sync::LazyLock;

use regex::Regex;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Matches the hidden `logintoken` input, `name` attribute first.
static LOGIN_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r#"(?is)<input\b[^>]*name\s*=\s*["']logintoken["'][^>]*value\s*=\s*["']([^"']+)["']"#,
    )
});

/// Matches the hidden `logintoken` input with `value` before `name`.
static LOGIN_TOKEN_VALUE_FIRST_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r#"(?is)<input\b[^>]*value\s*=\s*["']([^"']+)["'][^>]*name\s*=\s*["']logintoken["']"#,
    )
});

/// Matches the `"sesskey":"..."` entry in inline script configuration.
static SESSKEY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r#""sesskey":"([A-Za-z0-9]+)""#));

/// Marker string present in the portal's login-form markup.
///
/// An authenticated page never carries it, so its presence in a fetched body
/// signals an expired session.
pub const LOGIN_FORM_MARKER: &str = "loginform";

/// Extracts the single-use anti-forgery token from login page markup.
///
/// The portal rejects stale tokens, so callers must extract a fresh one for
/// every login attempt.
///
/// # Errors
///
/// Returns [`ParseError::TokenNotFound`] when the `logintoken` control is
/// absent from the markup.
pub fn extract_login_token(html: &str) -> Result<String, ParseError> {
    LOGIN_TOKEN_RE
        .captures(html)
        .or_else(|| LOGIN_TOKEN_VALUE_FIRST_RE.captures(html))
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .ok_or(ParseError::TokenNotFound)
}

/// Extracts the per-session `sesskey` from authenticated page markup.
///
/// The sesskey authorizes the portal's internal AJAX API calls and is
/// embedded in inline script configuration rather than in a form control.
///
/// # Errors
///
/// Returns [`ParseError::SesskeyNotFound`] when no sesskey entry is present.
pub fn extract_sesskey(html: &str) -> Result<String, ParseError> {
    SESSKEY_RE
        .captures(html)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .ok_or(ParseError::SesskeyNotFound)
}

/// Returns true when the markup contains the login-form marker.
#[must_use]
pub fn contains_login_form(html: &str) -> bool {
    html.contains(LOGIN_FORM_MARKER)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_login_token_name_first() {
        let html = r#"<form id="login">
            <input type="hidden" name="logintoken" value="abc123DEF">
        </form>"#;
        assert_eq!(extract_login_token(html).unwrap(), "abc123DEF");
    }

    #[test]
    fn test_extract_login_token_value_first() {
        let html = r#"<input type="hidden" value="xYz789" name="logintoken">"#;
        assert_eq!(extract_login_token(html).unwrap(), "xYz789");
    }

    #[test]
    fn test_extract_login_token_single_quotes() {
        let html = "<input name='logintoken' value='tok'>";
        assert_eq!(extract_login_token(html).unwrap(), "tok");
    }

    #[test]
    fn test_extract_login_token_missing_is_hard_failure() {
        let html = "<html><body><p>Dashboard</p></body></html>";
        assert_eq!(extract_login_token(html), Err(ParseError::TokenNotFound));
    }

    #[test]
    fn test_extract_login_token_empty_value_not_matched() {
        // An empty token is as useless as a missing one; the regex requires
        // at least one character so this surfaces as TokenNotFound.
        let html = r#"<input name="logintoken" value="">"#;
        assert_eq!(extract_login_token(html), Err(ParseError::TokenNotFound));
    }

    #[test]
    fn test_extract_login_token_ignores_other_inputs() {
        let html = r#"
            <input name="username" value="student">
            <input name="logintoken" value="real-token">
        "#;
        assert_eq!(extract_login_token(html).unwrap(), "real-token");
    }

    #[test]
    fn test_extract_sesskey_from_script_config() {
        let html = r#"<script>M.cfg = {"wwwroot":"https:\/\/portal","sesskey":"Ab12Cd34Ef","sessiontimeout":"7200"};</script>"#;
        assert_eq!(extract_sesskey(html).unwrap(), "Ab12Cd34Ef");
    }

    #[test]
    fn test_extract_sesskey_missing() {
        let html = "<script>var nothing = 1;</script>";
        assert_eq!(extract_sesskey(html), Err(ParseError::SesskeyNotFound));
    }

    #[test]
    fn test_contains_login_form_marker() {
        assert!(contains_login_form(
            r#"<div class="loginform"><form></form></div>"#
        ));
        assert!(!contains_login_form("<div class=\"dashboard\"></div>"));
    }
}
