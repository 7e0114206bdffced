//! Domain entities representing core token lifecycle objects.

pub mod authorization;
pub mod refresh;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use authorization::{Authorization, ServiceCredential};
pub use refresh::{RefreshRecord, REFRESH_RECORD_TTL_DAYS};
pub use session::{
    AccessTokenRecord, AuthCode, AuthCodeAccountXref, OauthFlow, Session, SessionAccessXref,
    SessionOauthXref,
};
pub use token::{
    Claims, Header, SignedToken, SERVICE_TOKEN_EXPIRY_MINUTES, SIGNING_ALG, TOKEN_TYPE,
};
