//! Authorization cache repository interface and mock.

mod mock;
mod r#trait;

pub use mock::MockAuthorizationRepository;
pub use r#trait::AuthorizationRepository;
