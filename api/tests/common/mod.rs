//! Shared setup for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{test, web};
use serde_json::json;

use kg_api::AppState;
use kg_core::services::auth::AuthService;
use kg_core::services::token::{KeyRing, TokenService, TokenServiceConfig};
use kg_infra::{InMemoryRateLimiter, InMemoryRevocationStore, InMemoryUserStore};
use kg_shared::{JwtConfig, RateLimitConfig};

pub use kg_infra::DEMO_PASSWORD as PASSWORD;

pub type TestState = AppState<InMemoryUserStore, InMemoryRateLimiter, InMemoryRevocationStore>;

pub const CLIENT_HEADER: &str = "X-Real-IP";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        keys_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../keys").to_string(),
        ..JwtConfig::default()
    }
}

pub fn token_service() -> Arc<TokenService> {
    let jwt = jwt_config();
    let keys = KeyRing::from_config(&jwt).expect("development keys load");
    let config = TokenServiceConfig::from_jwt_config(&jwt).expect("valid jwt config");
    Arc::new(TokenService::new(config, Arc::new(keys)))
}

/// State backed by the real in-memory stores and the development keys
pub fn test_state_with_limit(login_limit: usize) -> web::Data<TestState> {
    let users = Arc::new(InMemoryUserStore::with_demo_users(4).expect("demo users"));
    let limiter = Arc::new(InMemoryRateLimiter::new(&RateLimitConfig {
        login_limit,
        login_window_seconds: 300,
    }));
    let auth_service = Arc::new(AuthService::new(
        users,
        limiter,
        Arc::new(InMemoryRevocationStore::new()),
        token_service(),
    ));

    web::Data::new(AppState::new(
        auth_service,
        CLIENT_HEADER,
        &["admin".to_string()],
    ))
}

pub fn test_state() -> web::Data<TestState> {
    test_state_with_limit(100)
}

pub fn login_request(email: &str, password: &str, client: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/login")
        .insert_header((CLIENT_HEADER, client))
        .set_json(json!({ "email": email, "password": password }))
}

pub fn refresh_request(refresh_token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
}

pub fn get_with_token(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
}
