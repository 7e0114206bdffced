//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `retry` - Retry and backoff policy for remote calls

pub mod database;
pub mod retry;

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use retry::RetryPolicy;
