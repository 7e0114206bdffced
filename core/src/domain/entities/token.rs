//! Token entities for the ES512-signed authorization tokens.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service token expiration time (15 minutes)
pub const SERVICE_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Signing algorithm identifier carried in the token header
pub const SIGNING_ALG: &str = "ES512";

/// Token type tag carried in the token header
pub const TOKEN_TYPE: &str = "JWT";

/// Token header describing the signing algorithm and token type
///
/// Immutable once set; the header bytes are part of the signed material,
/// so any change after signing invalidates the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Algorithm identifier
    pub alg: String,

    /// Token type tag
    pub typ: String,
}

impl Header {
    /// Creates the standard ES512 header
    pub fn es512() -> Self {
        Self {
            alg: SIGNING_ALG.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

/// Claims structure for the token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Unique token identifier
    pub jti: String,

    /// Issuer
    pub iss: String,

    /// Subject (the authenticated identity)
    pub sub: String,

    /// Audience: the service names this token is valid for
    pub aud: Vec<String>,

    /// Issued at timestamp (epoch seconds)
    pub iat: i64,

    /// Not before timestamp (epoch seconds)
    pub nbf: i64,

    /// Expiration timestamp (epoch seconds)
    pub exp: i64,

    /// Space-delimited permission scopes, e.g. "r:svcA:* w:svcB:*"
    pub scp: String,
}

impl Claims {
    /// Creates new claims for a service token
    ///
    /// # Arguments
    ///
    /// * `issuer` - The issuing service name
    /// * `subject` - The authenticated identity the token represents
    /// * `audience` - Service names the token is valid for
    /// * `scopes` - Space-delimited permission scopes
    ///
    /// # Returns
    ///
    /// A new `Claims` instance valid from now for
    /// [`SERVICE_TOKEN_EXPIRY_MINUTES`]
    pub fn new_service_token(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        audience: Vec<String>,
        scopes: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::minutes(SERVICE_TOKEN_EXPIRY_MINUTES);

        Self {
            jti: Uuid::new_v4().to_string(),
            iss: issuer.into(),
            sub: subject.into(),
            aud: audience,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            scp: scopes.into(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        now > self.exp
    }

    /// Checks if the given service name appears in the audience list
    pub fn has_audience(&self, service_name: &str) -> bool {
        self.aud.iter().any(|a| a == service_name)
    }
}

/// A fully signed token together with its compact wire form
///
/// Invariant: `compact` is always
/// `base64url(json(header)) + "." + base64url(json(claims)) + "." + base64url(signature)`
/// and the signature covers exactly the first two dot-joined segments.
/// The struct is assembled once at signing time and never re-marshaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// Token header
    pub header: Header,

    /// Token claims
    pub claims: Claims,

    /// Raw signature bytes (fixed-width r ‖ s)
    pub signature: Vec<u8>,

    /// Compact three-segment wire form
    pub compact: String,
}
