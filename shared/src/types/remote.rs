//! Wire-level structures exchanged with remote services

use serde::{Deserialize, Serialize};

/// Structured error body returned by remote services on non-2xx responses
///
/// Every internal service answers failed requests with this shape, so the
/// resilient caller can decode the body regardless of which service
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub code: i32,

    /// Human-readable error message
    pub message: String,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
