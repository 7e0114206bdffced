//! Remote auth gateway over the resilient caller

use async_trait::async_trait;
use serde::Serialize;

use tk_core::domain::entities::authorization::ServiceCredential;
use tk_core::errors::{DomainError, DomainResult};
use tk_core::services::s2s::{AuthGateway, AuthorizationGrant};

use super::caller::ResilientServiceCaller;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// `AuthGateway` implementation against the remote auth service's login
/// and refresh endpoints
pub struct RemoteAuthGateway {
    caller: ResilientServiceCaller,
    login_url: String,
    refresh_url: String,
}

impl RemoteAuthGateway {
    /// Creates a gateway for the auth service at `base_url`
    ///
    /// # Arguments
    ///
    /// * `caller` - The resilient caller, carrying retry policy and
    ///   transport configuration
    /// * `base_url` - Scheme and authority of the auth service, without a
    ///   trailing slash
    pub fn new(caller: ResilientServiceCaller, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            login_url: format!("{}/auth/login", base_url),
            refresh_url: format!("{}/auth/refresh", base_url),
            caller,
        }
    }
}

#[async_trait]
impl AuthGateway for RemoteAuthGateway {
    async fn login(&self, credential: &ServiceCredential) -> DomainResult<AuthorizationGrant> {
        self.caller
            .post(
                &self.login_url,
                "",
                "",
                &LoginRequest {
                    client_id: &credential.client_id,
                    client_secret: &credential.client_secret,
                },
            )
            .await
            .map_err(DomainError::Network)
    }

    async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthorizationGrant> {
        self.caller
            .post(&self.refresh_url, "", "", &RefreshRequest { refresh_token })
            .await
            .map_err(DomainError::Network)
    }
}
