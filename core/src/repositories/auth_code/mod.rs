//! Authorization code repository interface and mock.

mod mock;
mod r#trait;

pub use mock::MockAuthCodeRepository;
pub use r#trait::AuthCodeRepository;
