//! Timeout constants for the portal transport.
//!
//! All portal traffic is small HTML pages, so timeouts are tight compared to
//! what a file-download client would use. No cancellation tokens are threaded
//! through calls; these deadlines are the only bound on a hung request.

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (30 seconds).
pub const READ_TIMEOUT_SECS: u64 = 30;
