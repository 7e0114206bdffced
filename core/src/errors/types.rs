//! Error type definitions for token verification and remote calls.
//!
//! Verification errors carry enough classification for callers to log
//! safely; boundary code is expected to collapse them to a single generic
//! "unauthorized" signal rather than forwarding the specific reason to end
//! users.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Token audience does not include this service")]
    AudienceMismatch,

    #[error("Token carries no sufficient scope")]
    InsufficientScope,

    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Token signing failed: {message}")]
    SigningFailed { message: String },

    #[error("Key loading failed: {message}")]
    KeyLoadError { message: String },
}

/// Errors from remote service calls
///
/// `Timeout` and the retryable status classes are only surfaced once the
/// retry policy is exhausted; every other variant fails the call on the
/// first attempt.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Unexpected response content type: {content_type}")]
    UnexpectedContentType { content_type: String },

    #[error("Undecodable response body: {message}")]
    InvalidBody { message: String },

    #[error("Retries exhausted: remote error {code}: {message}")]
    RetriesExhausted { code: i32, message: String },

    #[error("Remote error {status}: {code}: {message}")]
    RemoteStatus {
        status: u16,
        code: i32,
        message: String,
    },
}
