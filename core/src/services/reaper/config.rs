//! Expiry reaper configuration

use serde::{Deserialize, Serialize};

/// Configuration for the expiry reaper workers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaperConfig {
    /// Local hour of day each worker targets for its sweep
    pub sweep_hour: u32,

    /// Jitter window around the target hour, in minutes, applied in both
    /// directions and freshly drawn each cycle
    pub jitter_minutes: i64,

    /// Age threshold in hours after which a session is considered stale
    pub session_max_age_hours: i64,

    /// Maximum concurrent per-row deletes during xref fan-out; size this
    /// to the database connection pool
    pub delete_concurrency: usize,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            sweep_hour: 2,
            jitter_minutes: 30,
            session_max_age_hours: 24,
            delete_concurrency: 10,
        }
    }
}

impl ReaperConfig {
    /// Set the stale-session age threshold in hours
    pub fn with_session_max_age_hours(mut self, hours: i64) -> Self {
        self.session_max_age_hours = hours;
        self
    }

    /// Set the per-row delete concurrency bound
    pub fn with_delete_concurrency(mut self, concurrency: usize) -> Self {
        self.delete_concurrency = concurrency;
        self
    }
}
