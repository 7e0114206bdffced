//! Remote auth service gateway contract.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::authorization::ServiceCredential;
use crate::errors::DomainResult;

/// A grant returned by the remote auth service on login or refresh
///
/// Timestamps travel as epoch seconds on the wire, matching the claim
/// encoding inside the tokens themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationGrant {
    /// The signed service token in compact form
    pub service_token: String,

    /// When the service token expires
    #[serde(with = "chrono::serde::ts_seconds")]
    pub token_expires: DateTime<Utc>,

    /// Refresh token usable to obtain a successor service token
    pub refresh_token: String,

    /// When the refresh token expires
    #[serde(with = "chrono::serde::ts_seconds")]
    pub refresh_expires: DateTime<Utc>,
}

/// Gateway to the remote auth service
///
/// Implementations execute JSON-over-HTTP requests against the login and
/// refresh endpoints over an already-secured connection; the concrete
/// implementation with retry handling lives in the infrastructure crate.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Perform a full client-credential login
    ///
    /// # Arguments
    /// * `credential` - The client credential to authenticate with
    ///
    /// # Returns
    /// * `Ok(AuthorizationGrant)` - A fresh token pair
    /// * `Err(DomainError)` - The remote call failed
    async fn login(&self, credential: &ServiceCredential) -> DomainResult<AuthorizationGrant>;

    /// Exchange a refresh token for a successor token pair
    ///
    /// # Arguments
    /// * `refresh_token` - The refresh token to exchange
    ///
    /// # Returns
    /// * `Ok(AuthorizationGrant)` - A fresh token pair
    /// * `Err(DomainError)` - The remote call failed
    async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthorizationGrant>;
}

#[async_trait]
impl<T: AuthGateway + ?Sized> AuthGateway for Arc<T> {
    async fn login(&self, credential: &ServiceCredential) -> DomainResult<AuthorizationGrant> {
        (**self).login(credential).await
    }

    async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthorizationGrant> {
        (**self).refresh(refresh_token).await
    }
}
