//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - Access and refresh token signing with the current key
//! - Verification against any non-retired key, selected by kid
//! - RS256 key ring with rotation and retirement

mod config;
mod key_manager;
mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use config::TokenServiceConfig;
pub use key_manager::{KeyPair, KeyRing};
pub use service::TokenService;
