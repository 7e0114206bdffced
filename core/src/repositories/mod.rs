//! Repository interfaces for persistence collaborators.
//!
//! Each sub-module defines an async trait plus an in-memory mock used by
//! unit tests. Concrete SQL implementations live in the infrastructure
//! crate.

pub mod auth_code;
pub mod authorization;
pub mod refresh_token;
pub mod session;

pub use auth_code::{AuthCodeRepository, MockAuthCodeRepository};
pub use authorization::{AuthorizationRepository, MockAuthorizationRepository};
pub use refresh_token::{MockRefreshTokenRepository, RefreshTokenRepository};
pub use session::{MockSessionRepository, SessionRepository};
