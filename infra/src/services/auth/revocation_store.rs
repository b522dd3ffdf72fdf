//! In-memory store of consumed refresh tokens

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};

use kg_core::{DomainResult, RevocationStoreTrait};

/// Revoked refresh tokens keyed by the SHA-256 of the token text
///
/// Each entry lives through the token's own `exp` second, the last second
/// in which the token still parses. Expired entries are only dropped when
/// looked up.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    entries: Mutex<HashMap<String, i64>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revokes `token` until `expires_at_unix` as seen at `now`
    pub fn revoke_at(&self, token: &str, expires_at_unix: i64, now: i64) -> bool {
        let key = token_key(token);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if matches!(entries.get(&key), Some(exp) if *exp >= now) {
            return false;
        }

        entries.insert(key, expires_at_unix);
        true
    }

    /// Whether `token` is revoked as seen at `now`
    pub fn is_revoked_at(&self, token: &str, now: i64) -> bool {
        let key = token_key(token);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(&key) {
            Some(exp) if *exp >= now => true,
            Some(_) => {
                entries.remove(&key);
                false
            }
            None => false,
        }
    }

    /// Number of entries currently held
    pub fn entry_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl RevocationStoreTrait for InMemoryRevocationStore {
    async fn add(&self, token: &str, expires_at_unix: i64) -> DomainResult<bool> {
        let revoked = self.revoke_at(token, expires_at_unix, Utc::now().timestamp());
        if revoked {
            tracing::debug!(expires_at = expires_at_unix, "Refresh token revoked");
        }
        Ok(revoked)
    }

    async fn is_revoked(&self, token: &str) -> DomainResult<bool> {
        Ok(self.is_revoked_at(token, Utc::now().timestamp()))
    }

    async fn len(&self) -> DomainResult<usize> {
        Ok(self.entry_count())
    }
}

fn token_key(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
