//! Refresh token repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::refresh::RefreshRecord;
use crate::errors::DomainResult;

/// Repository trait for server-side `RefreshRecord` persistence
///
/// Expiry is not a stored column: callers recompute it from `created_at`
/// through [`RefreshRecord::expires_at`], and the reaper's cutoff must use
/// the same arithmetic.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Save a new refresh record
    ///
    /// # Returns
    /// * `Ok(RefreshRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g. duplicate token hash)
    async fn save(&self, record: RefreshRecord) -> DomainResult<RefreshRecord>;

    /// Find a record by its hashed token value
    ///
    /// # Returns
    /// * `Ok(Some(RefreshRecord))` - Record found
    /// * `Ok(None)` - No record with the given hash
    /// * `Err(DomainError)` - Lookup failed
    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<RefreshRecord>>;

    /// Revoke the record with the given token hash
    ///
    /// # Returns
    /// * `Ok(true)` - Record was revoked
    /// * `Ok(false)` - Record not found
    /// * `Err(DomainError)` - Revocation failed
    async fn revoke(&self, token_hash: &str) -> DomainResult<bool>;

    /// Delete every record created at or before `cutoff`
    ///
    /// The cutoff is `now - REFRESH_RECORD_TTL_DAYS`, recomputed by the
    /// caller; records past it are expired by definition.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> DomainResult<usize>;
}
