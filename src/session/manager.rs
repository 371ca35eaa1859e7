//! Session lifecycle orchestration: login, validity probe, refresh, fetch.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::SessionError;
use crate::parser;
use crate::transport::PortalClient;

/// Portal path serving the login form and credential exchange.
pub const LOGIN_PATH: &str = "/login/index.php";

/// Authenticated landing page, used as the validity probe target.
pub const DASHBOARD_PATH: &str = "/my/";

/// Name of the portal's session cookie.
pub const SESSION_COOKIE: &str = "MoodleSession";

/// Default retry budget for content fetches, shared across transient
/// network failures and expired-session re-logins.
pub const DEFAULT_FETCH_RETRIES: u32 = 3;

/// Default interval between background session refresh checks (30 minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Portal login credentials.
///
/// Immutable after construction. The password never appears in logs; the
/// `Debug` impl redacts it.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the login username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the session currently stands.
///
/// There is no terminal state while the process runs; a failed login simply
/// returns to `Unauthenticated` and can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session established yet, or the last login failed.
    Unauthenticated,
    /// A login attempt is in flight.
    Authenticating,
    /// The portal accepted the last credential exchange.
    Authenticated,
    /// An authenticated fetch was silently redirected to the login page.
    Expired,
}

/// Result of a login attempt.
///
/// `success: true` with `session_value: None` is possible: the portal
/// answered the credential exchange with a redirect but set no session
/// cookie. Callers must treat that as unusable for follow-up requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Whether the credential exchange was answered with a redirect status.
    pub success: bool,
    /// Value of the session cookie after the exchange, when present.
    pub session_value: Option<String>,
}

/// Manages a single authenticated session with the portal.
///
/// Owns the credential pair, a [`PortalClient`] transport (and through it
/// the cookie jar, which is the source of truth for the session cookie),
/// and an optional background refresh task. Clones share all of this, so
/// the refresh task operates on the same session as the request path.
#[derive(Debug, Clone)]
pub struct SessionManager {
    transport: PortalClient,
    credentials: Credentials,
    state: Arc<Mutex<SessionState>>,
    refresh_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionManager {
    /// Creates a manager for the portal at `base_url` with a fresh session.
    #[must_use]
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        Self::with_transport(PortalClient::new(base_url), credentials)
    }

    /// Creates a manager around an existing transport.
    ///
    /// Lets callers supply custom timeouts or a pre-seeded cookie jar.
    #[must_use]
    pub fn with_transport(transport: PortalClient, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            state: Arc::new(Mutex::new(SessionState::Unauthenticated)),
            refresh_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: SessionState) {
        *self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Reads the current session cookie value from the jar.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.transport
            .jar()
            .named(self.transport.base_url(), SESSION_COOKIE)
    }

    /// Logs in to the portal.
    ///
    /// Fetches the login page, extracts a fresh single-use token, and posts
    /// the credential exchange without following redirects: the portal
    /// signals success with a redirect status, and anything else (including
    /// a 200 re-rendering the form) is a rejection. Safe to call repeatedly;
    /// every call re-derives its own token.
    ///
    /// Failures (missing token, network error, non-redirect response) are
    /// reported through the outcome, never raised.
    #[instrument(skip(self))]
    pub async fn login(&self) -> LoginOutcome {
        self.set_state(SessionState::Authenticating);
        match self.login_attempt().await {
            Ok(session_value) => {
                if session_value.is_none() {
                    // Observed portal behavior: the exchange can redirect
                    // without issuing a session cookie. Reported as success
                    // with an absent value; callers decide what to do.
                    warn!("login accepted but no session cookie was set");
                }
                self.set_state(SessionState::Authenticated);
                info!("login successful");
                LoginOutcome {
                    success: true,
                    session_value,
                }
            }
            Err(error) => {
                warn!(error = %error, "login failed");
                self.set_state(SessionState::Unauthenticated);
                LoginOutcome {
                    success: false,
                    session_value: None,
                }
            }
        }
    }

    async fn login_attempt(&self) -> Result<Option<String>, SessionError> {
        let login_page = self.transport.get(LOGIN_PATH).await?;
        if !login_page.status.is_success() {
            return Err(SessionError::LoginPageUnavailable {
                status: login_page.status.as_u16(),
            });
        }

        let token = parser::extract_login_token(&login_page.body)?;
        debug!("extracted fresh login token");

        let form = [
            ("username", self.credentials.username()),
            ("password", self.credentials.password()),
            ("logintoken", token.as_str()),
        ];
        let response = self.transport.post_form_manual(LOGIN_PATH, &form).await?;
        debug!(status = %response.status, "credential exchange response");

        if !response.status.is_redirection() {
            return Err(SessionError::AuthenticationRejected {
                status: response.status.as_u16(),
            });
        }

        Ok(self.session_cookie())
    }

    /// Probes whether the current session is still accepted by the portal.
    ///
    /// Fetches the dashboard and checks both the landing URL and the body
    /// for the login-form marker. Detection only; this never triggers a
    /// re-login, and a transport failure counts as invalid.
    #[instrument(skip(self))]
    pub async fn is_session_valid(&self) -> bool {
        match self.transport.get(DASHBOARD_PATH).await {
            Ok(response) => {
                !response.redirected_to_login() && !parser::contains_login_form(&response.body)
            }
            Err(error) => {
                debug!(error = %error, "validity probe failed");
                false
            }
        }
    }

    /// One background maintenance pass: probe validity, re-login if needed.
    pub async fn refresh_session(&self) {
        if self.is_session_valid().await {
            debug!("session still valid");
            return;
        }
        info!("session expired; logging in again");
        let outcome = self.login().await;
        if outcome.success {
            info!("session refreshed");
        } else {
            warn!("session refresh login failed");
        }
    }

    /// Starts the periodic background refresh.
    ///
    /// Runs [`refresh_session`](Self::refresh_session) every `interval` on a
    /// task owned by this manager, off the critical path of any caller
    /// request. Calling it again while a task is running has no effect.
    pub fn start_refresh(&self, interval: Duration) {
        let mut guard = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            debug!("session refresh already scheduled");
            return;
        }

        let manager = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so the initial
            // refresh happens one full interval after scheduling.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                manager.refresh_session().await;
            }
        });
        *guard = Some(handle);
        info!(interval_secs = interval.as_secs(), "session refresh scheduled");
    }

    /// Cancels the scheduled refresh.
    ///
    /// Safe to call more than once, and safe when the refresh was never
    /// started.
    pub fn cleanup(&self) {
        let handle = self
            .refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("session refresh task stopped");
        }
    }

    /// Fetches an authenticated page with the default retry budget.
    ///
    /// See [`fetch_content_with_retries`](Self::fetch_content_with_retries).
    pub async fn fetch_content(&self, path: &str) -> Option<String> {
        self.fetch_content_with_retries(path, DEFAULT_FETCH_RETRIES)
            .await
    }

    /// Fetches an authenticated page, recovering from expiry and transient
    /// failures within a shared retry budget.
    ///
    /// Redirects are followed; landing on the login page means the session
    /// expired, which consumes one retry and triggers a re-login before the
    /// fetch is repeated. A transport error also consumes one retry but is
    /// repeated without re-login, since transient recovery is cheaper than a
    /// fresh credential exchange. The budget decrements on every failed
    /// attempt regardless of cause; when it runs out the result is `None`,
    /// never an error.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn fetch_content_with_retries(&self, path: &str, retries: u32) -> Option<String> {
        let mut remaining = retries;
        loop {
            match self.transport.get(path).await {
                Ok(response) if response.redirected_to_login() => {
                    self.set_state(SessionState::Expired);
                    if remaining == 0 {
                        warn!(path, "re-login attempts exhausted; giving up");
                        return None;
                    }
                    remaining -= 1;
                    info!(remaining, "session expired; logging in again");
                    let outcome = self.login().await;
                    if !outcome.success {
                        // The next attempt will land on the login page again
                        // and spend another retry on a fresh login.
                        warn!(remaining, "re-login failed");
                    }
                }
                Ok(response) => return Some(response.body),
                Err(error) => {
                    if remaining == 0 {
                        warn!(path, error = %error, "content fetch failed; retries exhausted");
                        return None;
                    }
                    remaining -= 1;
                    warn!(path, error = %error, remaining, "content fetch failed; retrying");
                }
            }
        }
    }

    /// Fetches the dashboard and extracts the per-session `sesskey`.
    ///
    /// The sesskey is embedded in authenticated page scripts and authorizes
    /// the portal's internal AJAX calls; collaborators read it from the
    /// session record.
    pub async fn fetch_sesskey(&self) -> Option<String> {
        let body = self.fetch_content(DASHBOARD_PATH).await?;
        match parser::extract_sesskey(&body) {
            Ok(sesskey) => Some(sesskey),
            Err(error) => {
                warn!(error = %error, "dashboard page carried no sesskey");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("student", "hunter2");
        let output = format!("{credentials:?}");
        assert!(output.contains("student"));
        assert!(!output.contains("hunter2"));
        assert!(output.contains("<redacted>"));
    }

    #[test]
    fn test_manager_starts_unauthenticated() {
        let base = Url::parse("https://portal.example/").unwrap();
        let manager = SessionManager::new(base, Credentials::new("u", "p"));
        assert_eq!(manager.state(), SessionState::Unauthenticated);
        assert_eq!(manager.session_cookie(), None);
    }

    #[tokio::test]
    async fn test_cleanup_without_refresh_is_a_no_op() {
        let base = Url::parse("https://portal.example/").unwrap();
        let manager = SessionManager::new(base, Credentials::new("u", "p"));
        manager.cleanup();
        manager.cleanup();
    }
}
