//! # TrustKit Core
//!
//! Core token lifecycle logic and domain layer for the TrustKit toolkit.
//! This crate contains domain entities, the ES512 signer and verifier, the
//! service-to-service token provider, the expiry reaper, repository
//! interfaces, and error types shared by every consuming service.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
