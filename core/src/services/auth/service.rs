//! Main authentication service implementation

use std::sync::Arc;

use crate::domain::entities::token::{Claims, TokenPair, TokenType};
use crate::domain::entities::user::UserRecord;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserStore;
use crate::services::token::TokenService;

use super::rate_limiter::RateLimiterTrait;
use super::revocation::RevocationStoreTrait;

/// Authentication service for the login, refresh and identity flows
pub struct AuthService<U, R, V>
where
    U: UserStore,
    R: RateLimiterTrait,
    V: RevocationStoreTrait,
{
    /// Credential checks and user lookups
    user_store: Arc<U>,
    /// Login attempt limiter
    rate_limiter: Arc<R>,
    /// Consumed refresh tokens
    revocation_store: Arc<V>,
    /// Token signer and verifier
    token_service: Arc<TokenService>,
}

impl<U, R, V> AuthService<U, R, V>
where
    U: UserStore,
    R: RateLimiterTrait,
    V: RevocationStoreTrait,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_store` - Store holding users and their password hashes
    /// * `rate_limiter` - Limiter applied to login attempts per client
    /// * `revocation_store` - Store of refresh tokens that were already used
    /// * `token_service` - Service signing and verifying tokens
    pub fn new(
        user_store: Arc<U>,
        rate_limiter: Arc<R>,
        revocation_store: Arc<V>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_store,
            rate_limiter,
            revocation_store,
            token_service,
        }
    }

    /// Exchanges credentials for a fresh token pair
    ///
    /// This method:
    /// 1. Records the attempt against `client_id`, rejecting once the window is full
    /// 2. Verifies the credentials, reporting unknown emails and wrong passwords identically
    /// 3. Signs an access + refresh pair for the user
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Credentials matched
    /// * `Err(AuthError::TooManyAttempts)` - Client exceeded the login limit
    /// * `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client_id: &str,
    ) -> DomainResult<TokenPair> {
        self.admit_login(client_id).await?;
        self.authenticate(email, password).await
    }

    /// Rate-limit gate of [`AuthService::login`]
    ///
    /// Exposed separately so a caller can count an attempt before it has
    /// looked at the request body.
    pub async fn admit_login(&self, client_id: &str) -> DomainResult<()> {
        if !self.rate_limiter.allow(client_id).await? {
            tracing::warn!(client_id = %client_id, "Login rate limit exceeded");
            return Err(AuthError::TooManyAttempts.into());
        }
        Ok(())
    }

    /// Credential check and pair issuance of [`AuthService::login`]
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let user = self
            .user_store
            .check_password(email, password)
            .await
            .map_err(|e| match e {
                DomainError::NotFound { .. } | DomainError::Auth(AuthError::InvalidCredentials) => {
                    DomainError::Auth(AuthError::InvalidCredentials)
                }
                other => other,
            })?;

        let pair = self.token_service.issue_pair(&user)?;
        tracing::info!(user_id = user.id, role = %user.role, "User logged in");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new pair, consuming the old token
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Token verified, was of refresh type and had not been used
    /// * `Err(AuthError::RefreshRevoked)` - Token was already exchanged
    /// * `Err(AuthError::InvalidRefresh)` - Signature, expiry, issuer or audience check failed
    /// * `Err(AuthError::InvalidRefreshType)` - An access token was presented
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        if self.revocation_store.is_revoked(refresh_token).await? {
            return Err(AuthError::RefreshRevoked.into());
        }

        let claims = self.token_service.parse(refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            DomainError::Auth(AuthError::InvalidRefresh {
                reason: e.to_string(),
            })
        })?;

        if claims.typ != TokenType::Refresh {
            return Err(AuthError::InvalidRefreshType.into());
        }

        // Check-and-set: a concurrent exchange of the same token loses here.
        if !self.revocation_store.add(refresh_token, claims.exp).await? {
            return Err(AuthError::RefreshRevoked.into());
        }

        let pair = self.token_service.issue_pair(&claims.identity())?;
        tracing::info!(user_id = claims.sub, "Refresh token exchanged");
        Ok(pair)
    }

    /// Identity carried by the claims the auth guard attached to a request
    pub fn identity(&self, claims: Option<&Claims>) -> DomainResult<UserRecord> {
        claims
            .map(Claims::identity)
            .ok_or_else(|| AuthError::ClaimsMissing.into())
    }

    /// Looks up a user by id
    pub async fn user_by_id(&self, id: i64) -> DomainResult<UserRecord> {
        self.user_store
            .by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {}", id),
            })
    }

    /// Number of users in the store
    pub async fn user_count(&self) -> DomainResult<usize> {
        self.user_store.count().await
    }

    /// Number of refresh tokens currently tracked as revoked
    pub async fn revoked_refresh_count(&self) -> DomainResult<usize> {
        self.revocation_store.len().await
    }

    /// Token service shared with the request guard
    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }
}
