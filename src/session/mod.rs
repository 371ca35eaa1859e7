//! Session lifecycle management for the portal.
//!
//! The session manager is the only component with real state: it acquires a
//! login token, performs the credential exchange, detects expiry through
//! redirect landings and the login-form marker, and transparently
//! re-authenticates while retrying in-flight fetches.
//!
//! # State machine
//!
//! ```text
//! Unauthenticated -> Authenticating -> Authenticated -> (Expired)
//!        ^                                                   |
//!        +------------------- Authenticating <---------------+
//! ```
//!
//! # Example
//!
//! ```no_run
//! use moodle_session::session::{Credentials, SessionManager};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = Url::parse("https://elearning.example.ac.id")?;
//! let manager = SessionManager::new(base, Credentials::new("nim", "password"));
//! let outcome = manager.login().await;
//! if outcome.success {
//!     let dashboard = manager.fetch_content("/my/").await;
//!     println!("dashboard available: {}", dashboard.is_some());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod record;

pub use error::SessionError;
pub use manager::{
    Credentials, DASHBOARD_PATH, DEFAULT_FETCH_RETRIES, DEFAULT_REFRESH_INTERVAL, LOGIN_PATH,
    LoginOutcome, SESSION_COOKIE, SessionManager, SessionState,
};
pub use record::{RecordError, SessionRecord};
