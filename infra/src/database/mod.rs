//! Database module - MySQL implementations using SQLx
//!
//! This module provides the database access layer:
//! - Connection pool management
//! - Repository implementations with explicit, typed row-scan functions

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{
    MySqlAuthCodeRepository, MySqlAuthorizationRepository, MySqlRefreshTokenRepository,
    MySqlSessionRepository,
};
