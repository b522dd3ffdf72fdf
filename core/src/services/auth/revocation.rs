//! Revocation tracking for single-use refresh tokens

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Remembers consumed refresh tokens until they would have expired anyway
#[async_trait]
pub trait RevocationStoreTrait: Send + Sync {
    /// Revokes `token` until `expires_at_unix`
    ///
    /// Returns `true` when this call performed the revocation and `false`
    /// when the token was already revoked and still live. The check and the
    /// write happen atomically, so of several concurrent calls for the same
    /// token exactly one returns `true`.
    async fn add(&self, token: &str, expires_at_unix: i64) -> DomainResult<bool>;

    /// Whether `token` is revoked and its recorded expiry is still ahead
    ///
    /// Entries whose expiry has passed are dropped and reported as not revoked.
    async fn is_revoked(&self, token: &str) -> DomainResult<bool>;

    /// Number of entries currently held, including ones not yet pruned
    async fn len(&self) -> DomainResult<usize>;
}
