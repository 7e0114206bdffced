//! Cached service-token provider

use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::entities::authorization::{Authorization, ServiceCredential};
use crate::errors::DomainResult;
use crate::repositories::{AuthorizationRepository, RefreshTokenRepository};

use super::gateway::{AuthGateway, AuthorizationGrant};

/// Provider of usable service tokens for S2S calls
///
/// The persistence store is the system of record for cached tokens, but
/// writes are fire-and-forget: a lost write costs one extra refresh or
/// login round trip on the next call, never a correctness failure. The
/// cache is therefore eventually consistent and self-healing.
pub struct S2sTokenProvider<A, R, G> {
    authorizations: Arc<A>,
    refresh_records: Arc<R>,
    gateway: G,
    credential: ServiceCredential,
}

impl<A, R, G> S2sTokenProvider<A, R, G>
where
    A: AuthorizationRepository + 'static,
    R: RefreshTokenRepository + 'static,
    G: AuthGateway,
{
    /// Creates a new provider for the given credential identity
    ///
    /// # Arguments
    ///
    /// * `authorizations` - Persisted service-token cache
    /// * `refresh_records` - Server-side refresh records, consulted for
    ///   revocation before a refresh attempt
    /// * `gateway` - Gateway to the remote auth service
    /// * `credential` - This service's client credential
    pub fn new(
        authorizations: Arc<A>,
        refresh_records: Arc<R>,
        gateway: G,
        credential: ServiceCredential,
    ) -> Self {
        Self {
            authorizations,
            refresh_records,
            gateway,
            credential,
        }
    }

    /// Obtains a usable service token
    ///
    /// 1. Query the cache for entries whose refresh window is still open.
    /// 2. Return the first entry whose service token is still live
    ///    (cache hit, no network call).
    /// 3. Otherwise exchange the first usable refresh token and persist
    ///    the resulting entry asynchronously.
    /// 4. Otherwise perform a full client-credential login, persisting
    ///    asynchronously as in 3.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - A service token in compact form
    /// * `Err(DomainError)` - Cache lookup or remote exchange failed
    pub async fn get_service_token(&self) -> DomainResult<String> {
        let now = Utc::now();
        let cached = self
            .authorizations
            .find_active(&self.credential.client_id, now)
            .await?;

        if let Some(hit) = cached.iter().find(|a| a.has_live_token(now)) {
            debug!(client_id = %self.credential.client_id, "service token cache hit");
            return Ok(hit.service_token.clone());
        }

        for entry in &cached {
            if !self.refresh_is_usable(&entry.refresh_token).await? {
                continue;
            }

            debug!(client_id = %self.credential.client_id, "refreshing service token");
            let grant = self.gateway.refresh(&entry.refresh_token).await?;
            let token = grant.service_token.clone();
            self.persist_async(self.entry_from_grant(grant));
            return Ok(token);
        }

        debug!(client_id = %self.credential.client_id, "logging in for service token");
        let grant = self.gateway.login(&self.credential).await?;
        let token = grant.service_token.clone();
        self.persist_async(self.entry_from_grant(grant));
        Ok(token)
    }

    /// Checks the server-side refresh record for revocation and computed
    /// expiry
    ///
    /// A missing record is treated as usable: the record may live in
    /// another service's store, and absence is not revocation.
    async fn refresh_is_usable(&self, refresh_token: &str) -> DomainResult<bool> {
        let hash = hash_token(refresh_token);
        match self.refresh_records.find_by_token_hash(&hash).await? {
            Some(record) => Ok(record.is_usable(Utc::now())),
            None => Ok(true),
        }
    }

    fn entry_from_grant(&self, grant: AuthorizationGrant) -> Authorization {
        Authorization::new(
            self.credential.client_id.clone(),
            grant.service_token,
            grant.token_expires,
            grant.refresh_token,
            grant.refresh_expires,
        )
    }

    /// Persists a cache entry without blocking or failing the caller
    ///
    /// The token has already been obtained; a failed write is logged and
    /// the next call simply takes the refresh or login path again.
    fn persist_async(&self, authorization: Authorization) {
        let repository = Arc::clone(&self.authorizations);
        tokio::spawn(async move {
            if let Err(e) = repository.save(authorization).await {
                warn!("failed to persist service token cache entry: {}", e);
            }
        });
    }
}

/// Hashes a refresh token for lookup against stored records
pub(crate) fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
