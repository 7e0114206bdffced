//! Server-side refresh token records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed server-side refresh record lifetime (30 days)
///
/// Expiry is never stored on the row; every reader recomputes it as
/// `created_at + REFRESH_RECORD_TTL_DAYS`. The reaper's cutoff and the
/// provider's usability check must stay in agreement through this constant.
pub const REFRESH_RECORD_TTL_DAYS: i64 = 30;

/// Refresh token record stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Hashed refresh token value
    pub token_hash: String,

    /// Identity (client or account) the token was issued to
    pub owner_id: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Whether the token has been revoked; revocation is one-way
    pub revoked: bool,
}

impl RefreshRecord {
    /// Creates a new refresh record
    pub fn new(token_hash: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            token_hash: token_hash.into(),
            owner_id: owner_id.into(),
            created_at: Utc::now(),
            revoked: false,
        }
    }

    /// Computed expiry of this record
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(REFRESH_RECORD_TTL_DAYS)
    }

    /// Checks if the record has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }

    /// Checks if the record is usable: neither expired nor revoked
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && !self.revoked
    }

    /// Revokes the record
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}
