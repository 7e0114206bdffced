//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the TrustKit
//! toolkit. It provides concrete implementations for the persistence and
//! transport collaborators the core crate defines interfaces for:
//! - **Database**: MySQL repository implementations using SQLx
//! - **HTTP**: the resilient JSON caller and the remote auth gateway

use thiserror::Error;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// HTTP module - resilient caller and remote auth gateway
pub mod http;

// Re-export core types for convenience
pub use tk_core::errors::{DomainError, NetworkError};

/// Errors raised while setting up infrastructure collaborators
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
