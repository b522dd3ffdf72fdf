//! Main token service implementation

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Header, Validation};

use crate::domain::entities::token::{Claims, TokenPair, TokenType};
use crate::domain::entities::user::{Role, UserRecord};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenServiceConfig;
use super::key_manager::KeyRing;

/// Signs and verifies access and refresh tokens
#[derive(Debug)]
pub struct TokenService {
    config: TokenServiceConfig,
    keys: Arc<KeyRing>,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service over a shared key ring
    pub fn new(config: TokenServiceConfig, keys: Arc<KeyRing>) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            config,
            keys,
            validation,
        }
    }

    /// Signs an access token valid for the configured access TTL
    pub fn sign_access(&self, subject_id: i64, email: &str, role: Role) -> DomainResult<String> {
        let user = UserRecord::new(subject_id, email, role);
        self.sign(&user, TokenType::Access, self.config.access_token_expiry_seconds)
    }

    /// Signs a refresh token valid for the configured refresh TTL
    pub fn sign_refresh(&self, subject_id: i64, email: &str, role: Role) -> DomainResult<String> {
        let user = UserRecord::new(subject_id, email, role);
        self.sign(&user, TokenType::Refresh, self.config.refresh_token_expiry_seconds)
    }

    /// Signs a fresh access + refresh pair for `user`
    pub fn issue_pair(&self, user: &UserRecord) -> DomainResult<TokenPair> {
        let access_token = self.sign_access(user.id, &user.email, user.role)?;
        let refresh_token = self.sign_refresh(user.id, &user.email, user.role)?;
        Ok(TokenPair::new(access_token, refresh_token))
    }

    fn sign(&self, user: &UserRecord, typ: TokenType, ttl_seconds: i64) -> DomainResult<String> {
        let claims = Claims::new(
            user,
            typ,
            Utc::now().timestamp(),
            ttl_seconds,
            &self.config.issuer,
            &self.config.audience,
        );
        self.encode_claims(&claims)
    }

    /// Encodes claims into a JWT with the current kid
    pub(crate) fn encode_claims(&self, claims: &Claims) -> DomainResult<String> {
        let (kid, encoding_key) = self.keys.signing_key()?;

        let mut header = Header::new(self.config.algorithm);
        header.kid = Some(kid.clone());

        encode(&header, claims, &encoding_key).map_err(|e| {
            tracing::error!(kid = %kid, error = %e, "Failed to sign token");
            DomainError::Token(TokenError::SigningFailed {
                message: e.to_string(),
            })
        })
    }

    /// Verifies a token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature, algorithm, kid, issuer, audience and expiry all check out
    /// * `Err(TokenError::InvalidSignature)` - Missing, unknown or retired kid, or bad signature
    /// * `Err(TokenError::UnexpectedAlgorithm)` - Header algorithm differs from configuration
    /// * `Err(TokenError::Expired)` - Current time is past `exp`
    /// * `Err(TokenError::AudienceOrIssuerMismatch)` - `iss` or `aud` differ from configuration
    /// * `Err(TokenError::Malformed)` - Not a decodable token
    ///
    /// The token type is not checked here; callers compare `claims.typ`
    /// against what their endpoint expects.
    pub fn parse(&self, token: &str) -> DomainResult<Claims> {
        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;

        if header.alg != self.config.algorithm {
            return Err(TokenError::UnexpectedAlgorithm {
                found: format!("{:?}", header.alg),
            }
            .into());
        }

        let kid = header.kid.ok_or(TokenError::InvalidSignature)?;
        let decoding_key = self
            .keys
            .decoding_key(&kid)
            .ok_or(TokenError::InvalidSignature)?;

        let token_data = decode::<Claims>(token, &decoding_key, &self.validation)
            .map_err(|e| map_decode_error(e.kind()))?;

        Ok(token_data.claims)
    }

    /// Retires keys superseded more than one refresh TTL ago
    pub fn retire_expired_keys(&self) -> Vec<String> {
        self.keys
            .retire_expired(self.config.refresh_token_expiry_seconds, Utc::now().timestamp())
    }

    /// Returns the key ring shared with this service
    pub fn key_ring(&self) -> &Arc<KeyRing> {
        &self.keys
    }

    /// Returns the service configuration
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }
}

fn map_decode_error(kind: &ErrorKind) -> DomainError {
    let error = match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
            TokenError::AudienceOrIssuerMismatch
        }
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => TokenError::UnexpectedAlgorithm {
            found: "unknown".to_string(),
        },
        _ => TokenError::Malformed,
    };
    DomainError::Token(error)
}
