//! Shared cookie jar scoped to the portal origin.

use std::fmt;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Cookie jar shared by the portal transport clients.
///
/// Wraps [`reqwest::cookie::Jar`] so both transport clients (redirect-follow
/// and redirect-manual) capture `Set-Cookie` headers into the same store,
/// while the session manager can read individual cookie values back out.
/// The inner jar is internally synchronized; each cookie-set operation is
/// atomic.
#[derive(Clone, Default)]
pub struct SessionJar {
    inner: Arc<Jar>,
}

impl SessionJar {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the inner jar for use as a reqwest cookie provider.
    #[must_use]
    pub(crate) fn provider(&self) -> Arc<Jar> {
        Arc::clone(&self.inner)
    }

    /// Serializes all cookies applicable to `url` into a `Cookie` header
    /// value, or `None` when the jar holds nothing for that origin.
    #[must_use]
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        self.inner
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Reads the value of a single cookie by name for `url`.
    #[must_use]
    pub fn named(&self, url: &Url, name: &str) -> Option<String> {
        let header = self.cookie_header(url)?;
        header.split("; ").find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }

    /// Stores a cookie from a `Set-Cookie` style string, scoped to `url`.
    ///
    /// Response cookies are captured automatically by the transport; this is
    /// for seeding a jar from a previously saved session value.
    pub fn set_cookie(&self, cookie_str: &str, url: &Url) {
        self.inner.add_cookie_str(cookie_str, url);
    }
}

impl fmt::Debug for SessionJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cookie values are session credentials; never print them.
        f.debug_struct("SessionJar").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn portal_url() -> Url {
        Url::parse("https://elearning.example.ac.id/").unwrap()
    }

    #[test]
    fn test_named_cookie_round_trip() {
        let jar = SessionJar::new();
        jar.set_cookie("MoodleSession=abc123; Path=/", &portal_url());

        assert_eq!(
            jar.named(&portal_url(), "MoodleSession"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_named_cookie_absent() {
        let jar = SessionJar::new();
        assert_eq!(jar.named(&portal_url(), "MoodleSession"), None);
    }

    #[test]
    fn test_named_picks_correct_cookie_among_several() {
        let jar = SessionJar::new();
        jar.set_cookie("MOODLEID1_=remember; Path=/", &portal_url());
        jar.set_cookie("MoodleSession=s3ss10n; Path=/", &portal_url());

        assert_eq!(
            jar.named(&portal_url(), "MoodleSession"),
            Some("s3ss10n".to_string())
        );
        assert_eq!(
            jar.named(&portal_url(), "MOODLEID1_"),
            Some("remember".to_string())
        );
    }

    #[test]
    fn test_cookies_do_not_leak_to_other_origins() {
        let jar = SessionJar::new();
        jar.set_cookie("MoodleSession=abc123; Path=/", &portal_url());

        let other = Url::parse("https://other.example.com/").unwrap();
        assert_eq!(jar.cookie_header(&other), None);
    }

    #[test]
    fn test_last_write_wins_for_same_name() {
        let jar = SessionJar::new();
        jar.set_cookie("MoodleSession=old; Path=/", &portal_url());
        jar.set_cookie("MoodleSession=new; Path=/", &portal_url());

        assert_eq!(
            jar.named(&portal_url(), "MoodleSession"),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_debug_does_not_print_cookie_values() {
        let jar = SessionJar::new();
        jar.set_cookie("MoodleSession=secret-value; Path=/", &portal_url());
        let output = format!("{jar:?}");
        assert!(!output.contains("secret-value"));
    }
}
