//! Business services containing the token lifecycle logic.

pub mod password;
pub mod reaper;
pub mod s2s;
pub mod token;

// Re-export commonly used types
pub use password::contains_keyboard_sequence;
pub use reaper::{ExpiryReaper, ReaperConfig, SweepReport};
pub use s2s::{AuthGateway, AuthorizationGrant, S2sTokenProvider};
pub use token::{Es512KeyManager, TokenServiceConfig, TokenSigner, TokenVerifier};
