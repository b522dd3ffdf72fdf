//! Configuration for the token service

use std::str::FromStr;

use jsonwebtoken::Algorithm;
use kg_shared::config::JwtConfig;

use crate::errors::{DomainError, TokenError};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing algorithm; tokens declaring anything else are rejected
    pub algorithm: Algorithm,
    /// Access token expiry in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token expiry in seconds
    pub refresh_token_expiry_seconds: i64,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            algorithm: Algorithm::RS256,
            access_token_expiry_seconds: jwt.access_token_expiry,
            refresh_token_expiry_seconds: jwt.refresh_token_expiry,
            issuer: jwt.issuer,
            audience: jwt.audience,
        }
    }
}

impl TokenServiceConfig {
    /// Builds the token service configuration from the shared JWT settings
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Unsupported JWT algorithm: {}", config.algorithm),
            })
        })?;

        if !matches!(algorithm, Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512) {
            return Err(DomainError::Token(TokenError::KeyLoadError {
                message: format!("Only RSA signing keys are supported, got {}", config.algorithm),
            }));
        }

        Ok(Self {
            algorithm,
            access_token_expiry_seconds: config.access_token_expiry,
            refresh_token_expiry_seconds: config.refresh_token_expiry,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }
}
