//! Scheduled expiry reaper for persistent security state
//!
//! One independent background worker per cleanup category deletes expired
//! rows on a daily jittered cadence:
//! - refresh token records past their computed TTL
//! - expired access tokens and their session xrefs
//! - service token cache entries whose refresh window closed
//! - stale sessions, their OAuth flows, and both xref kinds
//! - authorization codes past their fixed 10-minute TTL

mod config;
mod schedule;
mod service;

#[cfg(test)]
mod tests;

pub use config::ReaperConfig;
pub use schedule::next_sweep_time;
pub use service::{ExpiryReaper, SweepReport, AUTH_CODE_TTL_MINUTES};
