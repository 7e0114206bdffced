//! ES512 token verification and authorization decisions

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use p521::ecdsa::signature::Verifier;
use p521::ecdsa::{Signature, VerifyingKey};
use tracing::debug;

use crate::domain::entities::token::{Claims, Header, SIGNING_ALG};
use crate::domain::value_objects::scope::ScopeSet;
use crate::errors::{DomainError, DomainResult, TokenError};

use super::key_manager::Es512KeyManager;
use super::signer::SIGNATURE_LEN;

/// Allowed clock skew between issuing and verifying hosts, in seconds
pub const CLOCK_SKEW_SECS: i64 = 2;

/// Service for verifying compact tokens and evaluating authorization
///
/// Verification runs as a short-circuiting pipeline: segment split,
/// signature check, claims parse, temporal check, audience check, scope
/// check. The signature is verified before the claims are decoded, so an
/// unverified token never has its claims trusted or logged.
pub struct TokenVerifier {
    verifying_key: VerifyingKey,
    service_name: String,
}

impl TokenVerifier {
    /// Creates a new token verifier
    ///
    /// # Arguments
    ///
    /// * `keys` - Key manager holding the P-521 verifying key
    /// * `service_name` - This service's own name, matched against the
    ///   audience list
    pub fn new(keys: &Es512KeyManager, service_name: impl Into<String>) -> Self {
        Self {
            verifying_key: keys.verifying_key().clone(),
            service_name: service_name.into(),
        }
    }

    /// Verifies a compact token's signature and temporal/audience validity
    ///
    /// # Arguments
    ///
    /// * `compact` - The three-segment compact token
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The verified claims
    /// * `Err(DomainError)` - Classified verification failure
    pub fn verify(&self, compact: &str) -> DomainResult<Claims> {
        let segments: Vec<&str> = compact.split('.').collect();
        // Exactly three segments; a two-segment input is malformed, not a
        // degenerate unsigned token.
        if segments.len() != 3 {
            return Err(TokenError::Malformed.into());
        }

        let signing_input = format!("{}.{}", segments[0], segments[1]);
        let signature_bytes = URL_SAFE_NO_PAD
            .decode(segments[2])
            .map_err(|_| TokenError::Malformed)?;
        if signature_bytes.len() != SIGNATURE_LEN {
            return Err(TokenError::InvalidSignature.into());
        }
        let signature = Signature::from_slice(&signature_bytes)
            .map_err(|_| TokenError::InvalidSignature)?;

        self.verifying_key
            .verify(signing_input.as_bytes(), &signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        // Claims are only decoded once the signature has checked out.
        let header_json = URL_SAFE_NO_PAD
            .decode(segments[0])
            .map_err(|_| TokenError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;
        if header.alg != SIGNING_ALG {
            return Err(TokenError::Malformed.into());
        }

        let claims_json = URL_SAFE_NO_PAD
            .decode(segments[1])
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::InvalidClaims)?;

        let now = Utc::now().timestamp();
        if now + CLOCK_SKEW_SECS < claims.nbf {
            return Err(TokenError::NotYetValid.into());
        }
        if now > claims.exp {
            return Err(TokenError::Expired.into());
        }

        if !claims.has_audience(&self.service_name) {
            return Err(TokenError::AudienceMismatch.into());
        }

        Ok(claims)
    }

    /// Verifies a compact token and checks it grants at least one of the
    /// allowed scopes
    ///
    /// Scope matching is ANY-match: callers pass the minimum set of scopes
    /// sufficient for the requested operation, and a single overlap with
    /// the token's grant set authorizes the call. A token with an empty
    /// scope claim is never authorized.
    ///
    /// # Arguments
    ///
    /// * `allowed_scopes` - Scopes sufficient for the requested operation
    /// * `compact` - The three-segment compact token
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The verified, authorized claims
    /// * `Err(DomainError)` - Classified verification or scope failure
    pub fn is_authorized(&self, allowed_scopes: &[&str], compact: &str) -> DomainResult<Claims> {
        let claims = self.verify(compact)?;

        let scopes = ScopeSet::parse(&claims.scp);
        if !scopes.intersects(allowed_scopes) {
            return Err(TokenError::InsufficientScope.into());
        }

        Ok(claims)
    }

    /// Boundary form of [`is_authorized`](Self::is_authorized)
    ///
    /// Collapses every failure to `false`, logging the classified reason
    /// at debug level only. Request-authorization middleware should use
    /// this so end users cannot distinguish a signature failure from a
    /// scope or audience failure.
    pub fn authorize(&self, allowed_scopes: &[&str], compact: &str) -> bool {
        match self.is_authorized(allowed_scopes, compact) {
            Ok(_) => true,
            Err(e) => {
                debug!("authorization rejected: {}", e);
                false
            }
        }
    }

    /// Error-propagating boundary form of
    /// [`is_authorized`](Self::is_authorized)
    ///
    /// Collapses every failure into the generic
    /// [`DomainError::Unauthorized`] after logging the classified reason,
    /// for boundaries that surface errors instead of booleans.
    pub fn require_authorized(
        &self,
        allowed_scopes: &[&str],
        compact: &str,
    ) -> DomainResult<Claims> {
        self.is_authorized(allowed_scopes, compact).map_err(|e| {
            debug!("authorization rejected: {}", e);
            DomainError::Unauthorized
        })
    }
}
