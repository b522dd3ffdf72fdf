//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Login throttling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Max login attempts per client within the window
    pub login_limit: usize,

    /// Sliding window length in seconds
    pub login_window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_limit: 5,
            login_window_seconds: 300, // 5 minutes
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            login_limit: env_or("LOGIN_RATE_LIMIT", defaults.login_limit),
            login_window_seconds: env_or("LOGIN_RATE_WINDOW", defaults.login_window_seconds),
        }
    }
}
