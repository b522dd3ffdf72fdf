//! Authentication-related infrastructure services

pub mod rate_limiter;
pub mod revocation_store;

#[cfg(test)]
mod tests;

pub use rate_limiter::InMemoryRateLimiter;
pub use revocation_store::InMemoryRevocationStore;
