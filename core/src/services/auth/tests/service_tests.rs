//! Unit tests for authentication service

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;

use super::mocks::*;
use crate::domain::entities::token::TokenType;
use crate::domain::entities::user::{Role, UserRecord};
use crate::errors::{AuthError, DomainError};
use crate::services::auth::AuthService;
use crate::services::token::tests::fixtures::test_token_service;
use crate::services::token::TokenService;

type TestAuthService = AuthService<MockUserStore, MockRateLimiter, MockRevocationStore>;

struct Harness {
    service: Arc<TestAuthService>,
    users: Arc<MockUserStore>,
    revocations: Arc<MockRevocationStore>,
    tokens: Arc<TokenService>,
}

fn harness_with_limit(limit: usize) -> Harness {
    let users = Arc::new(MockUserStore::new());
    let revocations = Arc::new(MockRevocationStore::new());
    let tokens = Arc::new(test_token_service());
    let service = Arc::new(AuthService::new(
        users.clone(),
        Arc::new(MockRateLimiter::new(limit)),
        revocations.clone(),
        tokens.clone(),
    ));
    Harness {
        service,
        users,
        revocations,
        tokens,
    }
}

fn harness() -> Harness {
    harness_with_limit(5)
}

fn assert_auth_error<T: std::fmt::Debug>(result: Result<T, DomainError>, expected: AuthError) {
    match result {
        Err(DomainError::Auth(actual)) => assert_eq!(actual, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[tokio::test]
async fn test_login_issues_pair_for_user() {
    let h = harness();

    let pair = h
        .service
        .login("user@example.com", PASSWORD, "10.0.0.1")
        .await
        .unwrap();

    let access = h.tokens.parse(&pair.access_token).unwrap();
    let refresh = h.tokens.parse(&pair.refresh_token).unwrap();
    assert_eq!(access.typ, TokenType::Access);
    assert_eq!(refresh.typ, TokenType::Refresh);
    assert_eq!(access.sub, 2);
    assert_eq!(access.role, Role::User);
    assert_eq!(refresh.email, "user@example.com");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();

    let wrong_password = h.service.login("user@example.com", "nope", "10.0.0.1").await;
    let unknown_email = h.service.login("ghost@example.com", PASSWORD, "10.0.0.1").await;

    assert_auth_error(wrong_password, AuthError::InvalidCredentials);
    assert_auth_error(unknown_email, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn test_login_rate_limited_before_password_check() {
    let h = harness_with_limit(2);

    for _ in 0..2 {
        let _ = h.service.login("user@example.com", "nope", "10.0.0.1").await;
    }
    let result = h.service.login("user@example.com", PASSWORD, "10.0.0.1").await;

    assert_auth_error(result, AuthError::TooManyAttempts);
    assert_eq!(h.users.password_checks.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_rate_limit_is_per_client() {
    let h = harness_with_limit(1);

    assert!(h.service.login("user@example.com", PASSWORD, "10.0.0.1").await.is_ok());
    assert_auth_error(
        h.service.login("user@example.com", PASSWORD, "10.0.0.1").await,
        AuthError::TooManyAttempts,
    );
    assert!(h.service.login("user@example.com", PASSWORD, "10.0.0.2").await.is_ok());
}

#[tokio::test]
async fn test_refresh_rotates_and_revokes_old_token() {
    let h = harness();
    let pair = h.service.login("admin@example.com", PASSWORD, "c").await.unwrap();

    let rotated = h.service.refresh(&pair.refresh_token).await.unwrap();

    assert_ne!(rotated.refresh_token, pair.refresh_token);
    let claims = h.tokens.parse(&rotated.access_token).unwrap();
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(h.service.revoked_refresh_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_refresh_reuse_is_rejected() {
    let h = harness();
    let pair = h.service.login("user@example.com", PASSWORD, "c").await.unwrap();

    h.service.refresh(&pair.refresh_token).await.unwrap();
    let reuse = h.service.refresh(&pair.refresh_token).await;

    assert_auth_error(reuse, AuthError::RefreshRevoked);
}

#[tokio::test]
async fn test_refresh_with_access_token_rejected_without_revoking() {
    let h = harness();
    let pair = h.service.login("user@example.com", PASSWORD, "c").await.unwrap();

    let result = h.service.refresh(&pair.access_token).await;

    assert_auth_error(result, AuthError::InvalidRefreshType);
    assert_eq!(h.service.revoked_refresh_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_refresh_with_garbage_is_invalid_refresh() {
    let h = harness();

    match h.service.refresh("garbage").await {
        Err(DomainError::Auth(AuthError::InvalidRefresh { reason })) => {
            assert!(!reason.is_empty());
        }
        other => panic!("expected InvalidRefresh, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expired_revocation_entry_does_not_block() {
    let h = harness();
    let pair = h.service.login("user@example.com", PASSWORD, "c").await.unwrap();
    h.revocations
        .entries
        .lock()
        .unwrap()
        .insert(pair.refresh_token.clone(), Utc::now().timestamp() - 1);

    assert!(h.service.refresh(&pair.refresh_token).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_succeeds_once() {
    let h = harness();
    let pair = h.service.login("user@example.com", PASSWORD, "c").await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = h.service.clone();
            let token = pair.refresh_token.clone();
            tokio::spawn(async move { service.refresh(&token).await })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(e) => assert!(matches!(e, DomainError::Auth(AuthError::RefreshRevoked))),
        }
    }
    assert_eq!(succeeded, 1);
}

#[tokio::test]
async fn test_revocation_store_failure_propagates() {
    let tokens = Arc::new(test_token_service());
    let service = AuthService::new(
        Arc::new(MockUserStore::new()),
        Arc::new(MockRateLimiter::new(5)),
        Arc::new(FailingRevocationStore),
        tokens.clone(),
    );
    let refresh = tokens.sign_refresh(2, "user@example.com", Role::User).unwrap();

    assert!(matches!(
        service.refresh(&refresh).await,
        Err(DomainError::Internal { .. })
    ));
}

#[tokio::test]
async fn test_identity_requires_claims() {
    let h = harness();
    let pair = h.service.login("user@example.com", PASSWORD, "c").await.unwrap();
    let claims = h.tokens.parse(&pair.access_token).unwrap();

    assert_eq!(
        h.service.identity(Some(&claims)).unwrap(),
        UserRecord::new(2, "user@example.com", Role::User)
    );
    assert_auth_error(h.service.identity(None), AuthError::ClaimsMissing);
}

#[tokio::test]
async fn test_user_by_id() {
    let h = harness();

    assert_eq!(h.service.user_by_id(1).await.unwrap().role, Role::Admin);
    assert!(matches!(
        h.service.user_by_id(99).await,
        Err(DomainError::NotFound { .. })
    ));
    assert_eq!(h.service.user_count().await.unwrap(), 2);
}
