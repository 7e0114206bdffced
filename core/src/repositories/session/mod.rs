//! Session and access-token repository interface and mock.

mod mock;
mod r#trait;

pub use mock::MockSessionRepository;
pub use r#trait::SessionRepository;
