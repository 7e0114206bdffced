//! Value objects representing immutable domain concepts.

pub mod scope;

// Re-export commonly used types
pub use scope::ScopeSet;
