//! Token service configuration

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::SERVICE_TOKEN_EXPIRY_MINUTES;

/// Configuration for token signing and verification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenServiceConfig {
    /// Issuer claim stamped on minted tokens
    pub issuer: String,

    /// This service's own name, matched against the audience list during
    /// verification
    pub service_name: String,

    /// Service token lifetime in seconds
    pub token_ttl_secs: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            issuer: String::from("trustkit"),
            service_name: String::from("trustkit"),
            token_ttl_secs: SERVICE_TOKEN_EXPIRY_MINUTES * 60,
        }
    }
}

impl TokenServiceConfig {
    /// Create a configuration for a named service
    pub fn new(issuer: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the service token lifetime in seconds
    pub fn with_token_ttl_secs(mut self, secs: i64) -> Self {
        self.token_ttl_secs = secs;
        self
    }
}
