//! Session repository trait covering the rows the reaper sweeps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::{SessionAccessXref, SessionOauthXref};
use crate::errors::DomainResult;

/// Repository trait for sessions, access tokens, OAuth flows, and their
/// cross-reference rows
///
/// All deletes are idempotent: deleting an absent row is a no-op, so
/// overlapping sweeps and unawaited background deletes stay safe without
/// client-side locking.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find session↔access-token xrefs whose token's refresh expiry has
    /// passed at `now`
    async fn find_expired_access_token_xrefs(
        &self,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionAccessXref>>;

    /// Delete a single session↔access-token xref row
    async fn delete_access_token_xref(&self, id: Uuid) -> DomainResult<()>;

    /// Bulk-delete access token rows whose refresh expiry has passed at
    /// `now`
    ///
    /// Must only be called after every referencing xref has been deleted.
    async fn delete_expired_access_tokens(&self, now: DateTime<Utc>) -> DomainResult<usize>;

    /// Find session↔access-token xrefs whose owning session was created at
    /// or before `cutoff`
    async fn find_stale_session_access_xrefs(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionAccessXref>>;

    /// Find session↔OAuth-flow xrefs whose owning session was created at
    /// or before `cutoff`
    async fn find_stale_session_oauth_xrefs(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionOauthXref>>;

    /// Delete a single session↔OAuth-flow xref row
    async fn delete_session_oauth_xref(&self, id: Uuid) -> DomainResult<()>;

    /// Delete OAuth flow rows no longer referenced by any xref
    async fn delete_orphaned_oauth_flows(&self) -> DomainResult<usize>;

    /// Delete session rows no longer referenced by any xref
    async fn delete_orphaned_sessions(&self) -> DomainResult<usize>;
}
