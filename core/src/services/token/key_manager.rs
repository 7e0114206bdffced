//! P-521 key management for ES512 token signing and verification

use std::fs;
use std::path::{Path, PathBuf};

use p521::ecdsa::{SigningKey, VerifyingKey};
use p521::elliptic_curve::sec1::ToEncodedPoint;
use p521::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rand::rngs::OsRng;

use crate::errors::{DomainError, TokenError};

/// Manager for the P-521 key pair used in ES512 token operations
#[derive(Clone)]
pub struct Es512KeyManager {
    /// Private key for signing tokens
    signing_key: SigningKey,
    /// Public key for verifying tokens
    verifying_key: VerifyingKey,
    /// Path to private key file
    private_key_path: PathBuf,
    /// Path to public key file
    public_key_path: PathBuf,
}

impl std::fmt::Debug for Es512KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Es512KeyManager")
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .finish()
    }
}

impl Es512KeyManager {
    /// Creates a new key manager from key file paths
    ///
    /// # Arguments
    ///
    /// * `private_key_path` - Path to the PEM-encoded P-521 private key file
    /// * `public_key_path` - Path to the PEM-encoded P-521 public key file
    ///
    /// # Returns
    ///
    /// * `Ok(Es512KeyManager)` - Key manager initialized successfully
    /// * `Err(DomainError)` - Failed to load keys
    pub fn new<P: AsRef<Path>>(
        private_key_path: P,
        public_key_path: P,
    ) -> Result<Self, DomainError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let private_key_pem = fs::read_to_string(&private_key_path).map_err(|e| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Failed to read private key: {}", e),
            })
        })?;

        let public_key_pem = fs::read_to_string(&public_key_path).map_err(|e| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Failed to read public key: {}", e),
            })
        })?;

        let mut manager = Self::from_pem_strings(&private_key_pem, &public_key_pem)?;
        manager.private_key_path = private_key_path;
        manager.public_key_path = public_key_path;

        Ok(manager)
    }

    /// Creates a key manager from environment variables
    ///
    /// Expects the following environment variables:
    /// - `TOKEN_PRIVATE_KEY_PATH`: Path to private key file
    /// - `TOKEN_PUBLIC_KEY_PATH`: Path to public key file
    ///
    /// # Returns
    ///
    /// * `Ok(Es512KeyManager)` - Key manager initialized successfully
    /// * `Err(DomainError)` - Keys not found or invalid
    pub fn from_env() -> Result<Self, DomainError> {
        let private_key_path = std::env::var("TOKEN_PRIVATE_KEY_PATH")
            .unwrap_or_else(|_| "core/keys/token_private_key.pem".to_string());

        let public_key_path = std::env::var("TOKEN_PUBLIC_KEY_PATH")
            .unwrap_or_else(|_| "core/keys/token_public_key.pem".to_string());

        Self::new(private_key_path, public_key_path)
    }

    /// Creates a key manager from PEM strings (useful for testing or
    /// embedded keys)
    ///
    /// # Arguments
    ///
    /// * `private_key_pem` - PKCS#8 PEM-encoded P-521 private key
    /// * `public_key_pem` - SPKI PEM-encoded P-521 public key
    ///
    /// # Returns
    ///
    /// * `Ok(Es512KeyManager)` - Key manager initialized successfully
    /// * `Err(DomainError)` - Invalid key format
    pub fn from_pem_strings(
        private_key_pem: &str,
        public_key_pem: &str,
    ) -> Result<Self, DomainError> {
        let secret_key = p521::SecretKey::from_pkcs8_pem(private_key_pem).map_err(|e| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Invalid private key format: {}", e),
            })
        })?;

        let public_key = p521::PublicKey::from_public_key_pem(public_key_pem).map_err(|e| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Invalid public key format: {}", e),
            })
        })?;

        let signing_key = SigningKey::from_bytes(&secret_key.to_bytes()).map_err(|e| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Invalid private key format: {}", e),
            })
        })?;

        let verifying_key = VerifyingKey::from_encoded_point(&public_key.to_encoded_point(false))
            .map_err(|e| {
                DomainError::Token(TokenError::KeyLoadError {
                    message: format!("Invalid public key format: {}", e),
                })
            })?;

        Ok(Self {
            signing_key,
            verifying_key,
            private_key_path: PathBuf::from("memory"),
            public_key_path: PathBuf::from("memory"),
        })
    }

    /// Generates an ephemeral key pair
    ///
    /// Intended for tests and local development; production deployments
    /// load provisioned keys from PEM files.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);

        Self {
            signing_key,
            verifying_key,
            private_key_path: PathBuf::from("ephemeral"),
            public_key_path: PathBuf::from("ephemeral"),
        }
    }

    /// The signing key
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// The verifying key
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}
