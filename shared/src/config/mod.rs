//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing, key material and privileged roles
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Login throttling
//! - `server` - HTTP server binding and proxy trust

pub mod auth;
pub mod environment;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use auth::{AuthConfig, JwtConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Callers are expected to have loaded any `.env` file beforehand.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        logging.level = env_or("LOG_LEVEL", logging.level);

        Self {
            environment,
            server: ServerConfig::from_env(),
            auth: AuthConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            logging,
        }
    }
}

/// Reads and parses an environment variable, falling back to `default`
/// when it is unset or unparsable.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a comma-separated environment variable; `None` when unset or empty.
pub(crate) fn env_list(key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = std::env::var(key)
        .ok()?
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
