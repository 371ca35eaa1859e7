//! HTTP client wrapper for authenticated portal requests.
//!
//! `PortalClient` owns the shared cookie jar and two reqwest clients built
//! on top of it: one that follows redirects (ordinary content fetches) and
//! one with redirects disabled (the login exchange, where success is
//! signalled by a redirect status rather than by body content). Every
//! response's `Set-Cookie` headers are captured back into the jar by the
//! cookie provider, including responses to non-followed redirects.
//!
//! # TLS
//!
//! The portal serves an invalid (self-signed) certificate, so certificate
//! validation is disabled on these two clients. This is a deliberate trust
//! decision for one known origin, scoped to this transport; nothing else in
//! the crate builds a client this way.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::TransportError;
use crate::auth::SessionJar;

/// Browser-identity User-Agent sent on every portal request.
///
/// The portal serves stripped-down markup to unknown clients; a browser
/// identity keeps pages consistent with what the extractors expect.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Redirect handling for a single portal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirects {
    /// Follow redirects; the final landing URL is reported to the caller.
    Follow,
    /// Do not follow; the caller inspects the status and Location header.
    Manual,
}

/// Outcome of a portal request, captured before the response is consumed.
#[derive(Debug, Clone)]
pub struct PortalResponse {
    /// HTTP status of the final response.
    pub status: StatusCode,
    /// Headers of the final response.
    pub headers: HeaderMap,
    /// URL the request landed on after any redirects.
    pub final_url: Url,
    /// Decoded response body.
    pub body: String,
}

impl PortalResponse {
    /// Returns true when the request landed on the portal's login page.
    ///
    /// A followed redirect to login comes back as a 200, so the landing URL
    /// is the only reliable expired-session signal.
    #[must_use]
    pub fn redirected_to_login(&self) -> bool {
        self.final_url.as_str().contains("login")
    }
}

/// HTTP transport bound to a single portal origin.
///
/// Designed to be created once and cloned cheaply; both inner clients share
/// the same connection pools and cookie jar across clones.
#[derive(Debug, Clone)]
pub struct PortalClient {
    base_url: Url,
    jar: SessionJar,
    follow: Client,
    manual: Client,
}

impl PortalClient {
    /// Creates a transport for `base_url` with a fresh cookie jar and
    /// default timeouts.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_jar(base_url, SessionJar::new())
    }

    /// Creates a transport around an existing cookie jar.
    ///
    /// Used when resuming from a previously saved session cookie.
    #[must_use]
    pub fn with_jar(base_url: Url, jar: SessionJar) -> Self {
        Self::with_jar_and_timeouts(base_url, jar, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a transport with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_jar_and_timeouts(
        base_url: Url,
        jar: SessionJar,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Self {
        let follow = build_portal_client(
            &jar,
            connect_timeout_secs,
            read_timeout_secs,
            Policy::limited(10),
        );
        let manual =
            build_portal_client(&jar, connect_timeout_secs, read_timeout_secs, Policy::none());
        Self {
            base_url,
            jar,
            follow,
            manual,
        }
    }

    /// Returns the portal origin this transport is bound to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the cookie jar shared by both inner clients.
    #[must_use]
    pub fn jar(&self) -> &SessionJar {
        &self.jar
    }

    /// Fetches a portal path, following redirects.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on invalid paths, timeouts, or network
    /// failures. Non-success HTTP statuses are not errors; the caller
    /// inspects [`PortalResponse::status`].
    pub async fn get(&self, path: &str) -> Result<PortalResponse, TransportError> {
        self.send(Method::GET, path, None, None, Redirects::Follow)
            .await
    }

    /// Posts a form-encoded body without following redirects.
    ///
    /// Used for the credential exchange, where a redirect status is the
    /// success signal and must reach the caller unfollowed.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`get`](Self::get).
    pub async fn post_form_manual(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<PortalResponse, TransportError> {
        self.send(Method::POST, path, Some(form), None, Redirects::Manual)
            .await
    }

    /// Sends a request to a portal path.
    ///
    /// Stored cookies are attached automatically and response cookies are
    /// merged back into the jar. Caller-supplied `headers` take precedence
    /// over the client defaults (including the User-Agent).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidPath`] when `path` cannot be joined
    /// onto the base URL, [`TransportError::Timeout`] on request timeout,
    /// and [`TransportError::Network`] for other connection-level failures.
    #[instrument(level = "debug", skip(self, form, headers), fields(path = %path))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
        headers: Option<HeaderMap>,
        redirects: Redirects,
    ) -> Result<PortalResponse, TransportError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|_| TransportError::invalid_path(path))?;

        let client = match redirects {
            Redirects::Follow => &self.follow,
            Redirects::Manual => &self.manual,
        };

        let mut request = client.request(method, url.clone());
        if let Some(form) = form {
            request = request.form(form);
        }
        if let Some(headers) = headers {
            request = request.headers(headers);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::timeout(url.as_str())
            } else {
                TransportError::network(url.as_str(), e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(url.as_str(), e))?;

        debug!(status = %status, final_url = %final_url, "portal response");

        Ok(PortalResponse {
            status,
            headers,
            final_url,
            body,
        })
    }
}

/// Builds one of the two portal clients sharing the given jar.
///
/// # Panics
///
/// Panics if the builder fails with the static configuration.
#[allow(clippy::expect_used)]
fn build_portal_client(
    jar: &SessionJar,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    redirect: Policy,
) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .redirect(redirect)
        .cookie_provider(jar.provider())
        // The portal's certificate is self-signed; see module docs.
        .danger_accept_invalid_certs(true)
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .expect("failed to build portal HTTP client with static configuration")
}
