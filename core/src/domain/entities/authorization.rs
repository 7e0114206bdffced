//! Cached service-to-service authorization entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client credential used once per login against the remote auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCredential {
    /// Client identifier
    pub client_id: String,

    /// Client secret
    pub client_secret: String,
}

impl ServiceCredential {
    /// Creates a new service credential
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// Persisted service-token cache entry
///
/// Created at login or refresh and never mutated afterwards: a refresh
/// writes a new row that supersedes the old one, and only the reaper
/// deletes rows. The store is the system of record; a lost write costs one
/// extra login round trip, never a correctness failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// Unique identifier for this cache entry
    pub jti: String,

    /// Credential identity this entry was obtained for
    pub client_id: String,

    /// The signed service token in compact form
    pub service_token: String,

    /// Timestamp when the service token expires
    pub token_expires: DateTime<Utc>,

    /// Refresh token usable to obtain a successor service token
    pub refresh_token: String,

    /// Timestamp when the refresh token expires
    pub refresh_expires: DateTime<Utc>,
}

impl Authorization {
    /// Creates a new cache entry for a freshly obtained grant
    pub fn new(
        client_id: impl Into<String>,
        service_token: impl Into<String>,
        token_expires: DateTime<Utc>,
        refresh_token: impl Into<String>,
        refresh_expires: DateTime<Utc>,
    ) -> Self {
        Self {
            jti: Uuid::new_v4().to_string(),
            client_id: client_id.into(),
            service_token: service_token.into(),
            token_expires,
            refresh_token: refresh_token.into(),
            refresh_expires,
        }
    }

    /// Checks whether the cached service token is still usable at `now`
    pub fn has_live_token(&self, now: DateTime<Utc>) -> bool {
        self.token_expires > now
    }

    /// Checks whether the refresh token is still usable at `now`
    pub fn has_live_refresh(&self, now: DateTime<Utc>) -> bool {
        self.refresh_expires > now
    }
}
