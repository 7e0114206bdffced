//! Refresh token record repository interface and mock.

mod mock;
mod r#trait;

pub use mock::MockRefreshTokenRepository;
pub use r#trait::RefreshTokenRepository;
