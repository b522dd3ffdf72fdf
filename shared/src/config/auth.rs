//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

use super::{env_list, env_or};

/// JWT signing and validation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Algorithm for JWT signing (only RS256 keys are loaded)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Directory holding `{kid}_private.pem` and `{kid}_public.pem`
    pub keys_dir: String,

    /// Key ids loaded at startup, in order
    pub key_ids: Vec<String>,

    /// Key id used for new signatures
    pub current_kid: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("keygate-auth"),
            audience: String::from("keygate-clients"),
            algorithm: default_algorithm(),
            keys_dir: String::from("keys"),
            key_ids: vec![String::from("key1"), String::from("key2")],
            current_kid: String::from("key2"),
        }
    }
}

impl JwtConfig {
    /// Paths of the PEM files for a key id
    pub fn key_paths(&self, kid: &str) -> (String, String) {
        (
            format!("{}/{}_private.pem", self.keys_dir, kid),
            format!("{}/{}_public.pem", self.keys_dir, kid),
        )
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Roles exempt from resource ownership checks
    pub privileged_roles: Vec<String>,

    /// bcrypt cost used when hashing stored passwords
    pub password_hash_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            privileged_roles: vec![String::from("admin")],
            password_hash_cost: 12,
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let jwt = defaults.jwt;

        Self {
            jwt: JwtConfig {
                access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", jwt.access_token_expiry),
                refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", jwt.refresh_token_expiry),
                issuer: env_or("JWT_ISSUER", jwt.issuer),
                audience: env_or("JWT_AUDIENCE", jwt.audience),
                algorithm: jwt.algorithm,
                keys_dir: env_or("JWT_KEYS_DIR", jwt.keys_dir),
                key_ids: env_list("JWT_KEY_IDS").unwrap_or(jwt.key_ids),
                current_kid: env_or("JWT_CURRENT_KID", jwt.current_kid),
            },
            privileged_roles: env_list("JWT_PRIVILEGED_ROLES").unwrap_or(defaults.privileged_roles),
            password_hash_cost: env_or("BCRYPT_COST", defaults.password_hash_cost),
        }
    }
}

fn default_algorithm() -> String {
    String::from("RS256")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.algorithm, "RS256");
        assert_eq!(config.current_kid, "key2");
        assert_eq!(config.key_ids, vec!["key1", "key2"]);
    }

    #[test]
    fn test_key_paths() {
        let config = JwtConfig::default();
        let (private, public) = config.key_paths("key1");
        assert_eq!(private, "keys/key1_private.pem");
        assert_eq!(public, "keys/key1_public.pem");
    }
}
