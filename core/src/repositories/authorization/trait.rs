//! Authorization repository trait defining the service-token cache contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::authorization::Authorization;
use crate::errors::DomainResult;

/// Repository trait for persisted `Authorization` cache entries
///
/// Entries are append-only from the provider's point of view: a refresh or
/// login inserts a superseding row and the expiry reaper deletes rows whose
/// refresh window has closed. Rows are never updated in place.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Save a new authorization cache entry
    ///
    /// # Arguments
    /// * `authorization` - The entry to persist
    ///
    /// # Returns
    /// * `Ok(Authorization)` - The saved entry
    /// * `Err(DomainError)` - Save failed
    async fn save(&self, authorization: Authorization) -> DomainResult<Authorization>;

    /// Find all entries for a credential identity whose refresh token is
    /// still live at `now`
    ///
    /// # Arguments
    /// * `client_id` - The credential identity to look up
    /// * `now` - The instant to evaluate refresh expiry against
    ///
    /// # Returns
    /// * `Ok(Vec<Authorization>)` - Entries with `refresh_expires > now`,
    ///   in store order
    /// * `Err(DomainError)` - Lookup failed
    async fn find_active(
        &self,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Authorization>>;

    /// Delete every entry whose refresh token expired at or before `now`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries deleted
    /// * `Err(DomainError)` - Deletion failed
    async fn delete_refresh_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;
}
