//! Cookie management for the portal session.
//!
//! The portal's session identity lives entirely in cookies (most importantly
//! `MoodleSession`), so the jar here is the source of truth for session
//! state. It is mutated only by response processing; the session manager
//! reads the session cookie by name and never writes cookies directly.

mod cookies;

pub use cookies::SessionJar;
