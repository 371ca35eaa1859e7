//! Authenticated HTTP transport for the portal.
//!
//! This module wraps outbound requests to the portal origin: it attaches the
//! shared cookie jar and a browser-identity User-Agent, controls redirect
//! behavior per call, and exposes the final landing URL so callers can detect
//! a silent redirect to the login page.
//!
//! # Example
//!
//! ```no_run
//! use moodle_session::transport::PortalClient;
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = Url::parse("https://elearning.example.ac.id")?;
//! let client = PortalClient::new(base);
//! let response = client.get("/my/").await?;
//! println!("landed on {} ({})", response.final_url, response.status);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

pub use client::{BROWSER_USER_AGENT, PortalClient, PortalResponse, Redirects};
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::TransportError;
