//! Service-to-service token acquisition
//!
//! This module contains the cached service-token provider and the gateway
//! contract it uses to reach the remote auth service:
//! - Cache lookup against the persisted authorization store
//! - Refresh of an expiring token via a still-live refresh token
//! - Full client-credential login when no cached state is usable

mod gateway;
mod provider;

#[cfg(test)]
mod tests;

pub use gateway::{AuthGateway, AuthorizationGrant};
pub use provider::S2sTokenProvider;
