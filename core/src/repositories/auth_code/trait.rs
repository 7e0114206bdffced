//! Authorization code repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainResult;

/// Repository trait for one-time authorization codes and their account
/// cross-references
///
/// Codes expire on a short fixed TTL; the reaper passes the cutoff and
/// must delete the account xrefs before the code rows.
#[async_trait]
pub trait AuthCodeRepository: Send + Sync {
    /// Delete authcode↔account xrefs whose code was created at or before
    /// `cutoff`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of xref rows deleted
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_account_xrefs_for_expired(&self, cutoff: DateTime<Utc>)
        -> DomainResult<usize>;

    /// Delete authorization code rows created at or before `cutoff`
    ///
    /// Must only be called after the referencing xrefs are gone.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of code rows deleted
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_expired_codes(&self, cutoff: DateTime<Utc>) -> DomainResult<usize>;
}
