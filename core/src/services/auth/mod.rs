//! Authentication service module
//!
//! This module provides the login and refresh flows:
//! - Login throttling through a [`RateLimiterTrait`] implementation
//! - Credential checks delegated to the user store
//! - Single-use refresh tokens through a [`RevocationStoreTrait`] implementation
//! - Identity and resource lookups for authorized requests

mod rate_limiter;
mod revocation;
mod service;

#[cfg(test)]
mod tests;

pub use rate_limiter::RateLimiterTrait;
pub use revocation::RevocationStoreTrait;
pub use service::AuthService;
