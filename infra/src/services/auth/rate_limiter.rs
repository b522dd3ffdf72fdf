//! In-memory sliding-window rate limiter for login attempts

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use kg_core::{DomainResult, RateLimiterTrait};
use kg_shared::RateLimitConfig;

/// Calls between full sweeps of idle clients
const SWEEP_INTERVAL: u64 = 1024;

/// Sliding-window limiter keeping attempt instants per client
///
/// An attempt recorded at `t` counts against the client while
/// `now - t < window`; at exactly one window later it no longer counts.
/// Rejected attempts are not recorded.
pub struct InMemoryRateLimiter {
    limit: usize,
    window: Duration,
    attempts: Mutex<HashMap<String, Vec<Instant>>>,
    calls: AtomicU64,
}

impl InMemoryRateLimiter {
    /// Create a limiter from the login rate limit settings
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            limit: config.login_limit,
            window: Duration::from_secs(config.login_window_seconds),
            attempts: Mutex::new(HashMap::new()),
            calls: AtomicU64::new(0),
        }
    }

    /// Records an attempt for `client_id` if it is within the limit
    pub fn try_acquire(&self, client_id: &str) -> bool {
        let now = Instant::now();
        let mut attempts = self.attempts.lock().unwrap_or_else(PoisonError::into_inner);

        if self.calls.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            let window = self.window;
            attempts.retain(|_, instants| {
                instants.retain(|t| now.duration_since(*t) < window);
                !instants.is_empty()
            });
        }

        let instants = attempts.entry(client_id.to_string()).or_default();
        instants.retain(|t| now.duration_since(*t) < self.window);

        if instants.len() >= self.limit {
            tracing::debug!(
                client_id = %client_id,
                attempts = instants.len(),
                limit = self.limit,
                "Attempt rejected by rate limiter"
            );
            return false;
        }

        instants.push(now);
        true
    }

    /// Number of clients with attempts currently held in memory
    pub fn tracked_clients(&self) -> usize {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl RateLimiterTrait for InMemoryRateLimiter {
    async fn allow(&self, client_id: &str) -> DomainResult<bool> {
        Ok(self.try_acquire(client_id))
    }
}
