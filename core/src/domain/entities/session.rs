//! Session, flow, and cross-reference rows swept by the expiry reaper.
//!
//! The xref structs are pure join rows with no lifecycle of their own;
//! they must be deleted before either side of the join is deleted so the
//! store's foreign-key constraints hold without a transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A login session row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// An in-progress OAuth flow row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OauthFlow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A persisted access token row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenRecord {
    pub id: Uuid,
    /// Token identifier from the claims
    pub jti: String,
    pub expires_at: DateTime<Utc>,
    /// Expiry of the refresh token paired with this access token; the row
    /// is only reaped once this has passed
    pub refresh_expires_at: DateTime<Utc>,
}

/// A one-time authorization code row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCode {
    pub id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Join row linking a session to an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAccessXref {
    pub id: Uuid,
    pub session_id: Uuid,
    pub token_id: Uuid,
}

/// Join row linking a session to an OAuth flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOauthXref {
    pub id: Uuid,
    pub session_id: Uuid,
    pub flow_id: Uuid,
}

/// Join row linking an authorization code to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCodeAccountXref {
    pub id: Uuid,
    pub code_id: Uuid,
    pub account_id: Uuid,
}
