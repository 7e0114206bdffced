//! ES512 token signing

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use p521::ecdsa::signature::Signer;
use p521::ecdsa::{Signature, SigningKey};

use crate::domain::entities::token::{Claims, Header, SignedToken};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;
use super::key_manager::Es512KeyManager;

/// Fixed signature width for the ES512/P-521 configuration: the two
/// scalar outputs r and s are each serialized big-endian at the curve's
/// field width (66 bytes for P-521) and concatenated, regardless of their
/// natural size.
pub const SIGNATURE_LEN: usize = 132;

/// Service for minting ES512-signed compact tokens
pub struct TokenSigner {
    signing_key: SigningKey,
    config: TokenServiceConfig,
}

impl TokenSigner {
    /// Creates a new token signer
    ///
    /// # Arguments
    ///
    /// * `keys` - Key manager holding the P-521 signing key
    /// * `config` - Token service configuration
    pub fn new(keys: &Es512KeyManager, config: TokenServiceConfig) -> Self {
        Self {
            signing_key: keys.signing_key().clone(),
            config,
        }
    }

    /// Mints a compact token from the given claims
    ///
    /// The signature is computed over exactly
    /// `base64url(json(header)) + "." + base64url(json(claims))`; the
    /// compact form appends the base64url signature as a third segment.
    /// Claims are marshaled once, so no re-serialization can diverge from
    /// the signed bytes.
    ///
    /// # Arguments
    ///
    /// * `claims` - The claims to sign
    ///
    /// # Returns
    ///
    /// * `Ok(SignedToken)` - The signed token with its compact form
    /// * `Err(DomainError)` - Claims could not be serialized
    pub fn mint(&self, claims: &Claims) -> Result<SignedToken, DomainError> {
        let header = Header::es512();

        let header_json = serde_json::to_vec(&header).map_err(|e| {
            DomainError::Token(TokenError::SigningFailed {
                message: format!("Failed to encode header: {}", e),
            })
        })?;
        let claims_json = serde_json::to_vec(claims).map_err(|e| {
            DomainError::Token(TokenError::SigningFailed {
                message: format!("Failed to encode claims: {}", e),
            })
        })?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(claims_json)
        );

        // ECDSA over P-521 with SHA-512; to_bytes() yields the fixed-width
        // 66-byte r ‖ 66-byte s encoding.
        let signature: Signature = self.signing_key.sign(signing_input.as_bytes());
        let signature = signature.to_bytes().to_vec();

        let compact = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(&signature));

        Ok(SignedToken {
            header,
            claims: claims.clone(),
            signature,
            compact,
        })
    }

    /// Mints a compact service token for the given subject
    ///
    /// Builds claims from the configured issuer and token lifetime, then
    /// signs them.
    ///
    /// # Arguments
    ///
    /// * `subject` - The identity the token represents
    /// * `audience` - Service names the token is valid for
    /// * `scopes` - Space-delimited permission scopes
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact token
    /// * `Err(DomainError)` - Signing failed
    pub fn mint_service_token(
        &self,
        subject: impl Into<String>,
        audience: Vec<String>,
        scopes: impl Into<String>,
    ) -> Result<String, DomainError> {
        let mut claims =
            Claims::new_service_token(self.config.issuer.clone(), subject, audience, scopes);
        claims.exp = claims.iat + self.config.token_ttl_secs;

        Ok(self.mint(&claims)?.compact)
    }
}
