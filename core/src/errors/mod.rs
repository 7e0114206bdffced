//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{NetworkError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Generic boundary-facing authorization failure; the classified
    /// reason stays internal so callers never expose a
    /// signature/scope/audience oracle
    #[error("Unauthorized")]
    Unauthorized,

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

pub type DomainResult<T> = Result<T, DomainError>;
