//! Shared configuration and response types for the Keygate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The error body returned by every failing endpoint
//! - The fixed set of error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, Environment, JwtConfig, LoggingConfig, RateLimitConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
