//! Tests for token signing and parsing

use chrono::Utc;
use jsonwebtoken::{decode_header, encode, Algorithm, EncodingKey, Header};

use super::fixtures::{test_config, test_key_ring, test_token_service, KEY2_PRIVATE};
use crate::domain::entities::token::{Claims, TokenType};
use crate::domain::entities::user::{Role, UserRecord};
use crate::errors::{DomainError, TokenError};
use crate::services::token::{KeyRing, TokenService, TokenServiceConfig};

fn claims_for(typ: TokenType, iat: i64, ttl: i64) -> Claims {
    let user = UserRecord::new(2, "user@example.com", Role::User);
    Claims::new(&user, typ, iat, ttl, "keygate-auth", "keygate-clients")
}

fn assert_token_error(result: Result<Claims, DomainError>, expected: TokenError) {
    match result {
        Err(DomainError::Token(actual)) => assert_eq!(actual, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[test]
fn test_signed_claims_round_trip() {
    let service = test_token_service();
    let claims = claims_for(TokenType::Access, Utc::now().timestamp(), 900);

    let token = service.encode_claims(&claims).unwrap();
    let parsed = service.parse(&token).unwrap();

    assert_eq!(parsed, claims);
}

#[test]
fn test_sign_access_uses_current_kid_and_access_ttl() {
    let service = test_token_service();

    let token = service.sign_access(1, "admin@example.com", Role::Admin).unwrap();
    let header = decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some("key2"));

    let claims = service.parse(&token).unwrap();
    assert_eq!(claims.sub, 1);
    assert_eq!(claims.email, "admin@example.com");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.typ, TokenType::Access);
    assert_eq!(claims.exp - claims.iat, 900);
}

#[test]
fn test_sign_refresh_uses_refresh_ttl() {
    let service = test_token_service();

    let token = service.sign_refresh(2, "user@example.com", Role::User).unwrap();
    let claims = service.parse(&token).unwrap();

    assert_eq!(claims.typ, TokenType::Refresh);
    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
}

#[test]
fn test_issue_pair_returns_one_token_of_each_type() {
    let service = test_token_service();
    let user = UserRecord::new(2, "user@example.com", Role::User);

    let pair = service.issue_pair(&user).unwrap();

    assert_eq!(service.parse(&pair.access_token).unwrap().typ, TokenType::Access);
    assert_eq!(service.parse(&pair.refresh_token).unwrap().typ, TokenType::Refresh);
}

#[test]
fn test_expired_token_rejected() {
    let service = test_token_service();
    let issued = Utc::now().timestamp() - 1000;
    let token = service
        .encode_claims(&claims_for(TokenType::Access, issued, 900))
        .unwrap();

    assert_token_error(service.parse(&token), TokenError::Expired);
}

#[test]
fn test_issuer_mismatch_rejected() {
    let signer = test_token_service();
    let verifier = TokenService::new(
        TokenServiceConfig {
            issuer: "someone-else".to_string(),
            ..test_config()
        },
        signer.key_ring().clone(),
    );
    let token = signer.sign_access(2, "user@example.com", Role::User).unwrap();

    assert_token_error(verifier.parse(&token), TokenError::AudienceOrIssuerMismatch);
}

#[test]
fn test_audience_mismatch_rejected() {
    let signer = test_token_service();
    let verifier = TokenService::new(
        TokenServiceConfig {
            audience: "other-clients".to_string(),
            ..test_config()
        },
        signer.key_ring().clone(),
    );
    let token = signer.sign_access(2, "user@example.com", Role::User).unwrap();

    assert_token_error(verifier.parse(&token), TokenError::AudienceOrIssuerMismatch);
}

#[test]
fn test_unknown_kid_rejected() {
    let foreign = TokenService::new(
        test_config(),
        std::sync::Arc::new(
            KeyRing::new(vec![super::fixtures::key_pair("key3")], "key3").unwrap(),
        ),
    );
    let token = foreign.sign_access(2, "user@example.com", Role::User).unwrap();

    assert_token_error(test_token_service().parse(&token), TokenError::InvalidSignature);
}

#[test]
fn test_missing_kid_rejected() {
    let service = test_token_service();
    let claims = claims_for(TokenType::Access, Utc::now().timestamp(), 900);
    let key = EncodingKey::from_rsa_pem(KEY2_PRIVATE.as_bytes()).unwrap();
    let token = encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap();

    assert_token_error(service.parse(&token), TokenError::InvalidSignature);
}

#[test]
fn test_tampered_payload_rejected() {
    let service = test_token_service();
    let user_token = service.sign_access(2, "user@example.com", Role::User).unwrap();
    let admin_token = service.sign_access(1, "admin@example.com", Role::Admin).unwrap();

    // Admin payload with the user token's signature.
    let user_parts: Vec<&str> = user_token.split('.').collect();
    let admin_parts: Vec<&str> = admin_token.split('.').collect();
    let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

    assert_token_error(service.parse(&forged), TokenError::InvalidSignature);
}

#[test]
fn test_symmetric_algorithm_rejected() {
    let service = test_token_service();
    let claims = claims_for(TokenType::Access, Utc::now().timestamp(), 900);
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some("key2".to_string());
    let token = encode(&header, &claims, &EncodingKey::from_secret(b"guessable")).unwrap();

    match service.parse(&token) {
        Err(DomainError::Token(TokenError::UnexpectedAlgorithm { found })) => {
            assert_eq!(found, "HS256");
        }
        other => panic!("expected UnexpectedAlgorithm, got {:?}", other),
    }
}

#[test]
fn test_garbage_is_malformed() {
    let service = test_token_service();
    assert_token_error(service.parse("not-a-jwt"), TokenError::Malformed);
    assert_token_error(service.parse(""), TokenError::Malformed);
}

#[test]
fn test_non_numeric_subject_is_malformed() {
    let service = test_token_service();
    let (kid, key) = test_key_ring().signing_key().unwrap();
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid);
    let now = Utc::now().timestamp();
    let payload = serde_json::json!({
        "sub": "not-a-number",
        "email": "user@example.com",
        "role": "user",
        "iat": now,
        "exp": now + 900,
        "iss": "keygate-auth",
        "aud": "keygate-clients",
        "typ": "access",
        "jti": "d2b7c1c4-1111-4c3e-9c41-0a1b2c3d4e5f",
    });
    let token = encode(&header, &payload, &key).unwrap();

    assert_token_error(service.parse(&token), TokenError::Malformed);
}

#[test]
fn test_retire_expired_keys_drops_old_signer() {
    let service = test_token_service();
    let old_token = service.sign_access(2, "user@example.com", Role::User).unwrap();
    let ttl = service.config().refresh_token_expiry_seconds;

    service
        .key_ring()
        .rotate("key1", Utc::now().timestamp() - ttl - 1)
        .unwrap();
    assert!(service.parse(&old_token).is_ok());

    assert_eq!(service.retire_expired_keys(), vec!["key2".to_string()]);
    assert_token_error(service.parse(&old_token), TokenError::InvalidSignature);

    let new_token = service.sign_access(2, "user@example.com", Role::User).unwrap();
    assert_eq!(decode_header(&new_token).unwrap().kid.as_deref(), Some("key1"));
}

#[test]
fn test_default_config_follows_shared_jwt_defaults() {
    let jwt = kg_shared::JwtConfig::default();
    let config = TokenServiceConfig::default();
    let derived = TokenServiceConfig::from_jwt_config(&jwt).unwrap();

    assert_eq!(config.algorithm, Algorithm::RS256);
    assert_eq!(config.algorithm, derived.algorithm);
    assert_eq!(config.access_token_expiry_seconds, jwt.access_token_expiry);
    assert_eq!(config.refresh_token_expiry_seconds, jwt.refresh_token_expiry);
    assert_eq!(config.issuer, derived.issuer);
    assert_eq!(config.audience, derived.audience);
}
