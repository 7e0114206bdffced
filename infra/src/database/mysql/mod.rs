//! MySQL repository implementations.

mod auth_code_repository_impl;
mod authorization_repository_impl;
mod refresh_token_repository_impl;
mod session_repository_impl;

pub use auth_code_repository_impl::MySqlAuthCodeRepository;
pub use authorization_repository_impl::MySqlAuthorizationRepository;
pub use refresh_token_repository_impl::MySqlRefreshTokenRepository;
pub use session_repository_impl::MySqlSessionRepository;
