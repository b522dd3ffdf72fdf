//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Keygate service.
//! It provides concrete implementations of the collaborator traits that
//! `kg_core` depends on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Repositories**: the bcrypt-backed demo user store
//! - **Services**: in-memory login rate limiter and refresh revocation store

// Re-export core types for convenience
pub use kg_core::errors::*;

/// Repositories module - User storage
pub mod repositories;

/// Services module - Infrastructure service implementations
pub mod services;

pub use repositories::{InMemoryUserStore, DEMO_PASSWORD};
pub use services::auth::{InMemoryRateLimiter, InMemoryRevocationStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Password hashing error
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
