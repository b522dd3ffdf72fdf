//! Rate limiting trait for the login flow

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Sliding-window attempt limiter keyed by client identifier
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Records an attempt for `client_id` if it is within the limit
    ///
    /// Returns `false` without recording anything when the client already
    /// used up its attempts for the current window.
    async fn allow(&self, client_id: &str) -> DomainResult<bool>;
}
