use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use kg_api::{create_app, telemetry, AppState};
use kg_core::services::auth::AuthService;
use kg_core::services::token::{KeyRing, TokenService, TokenServiceConfig};
use kg_infra::{InMemoryRateLimiter, InMemoryRevocationStore, InMemoryUserStore};
use kg_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init(&config.logging);

    tracing::info!(environment = %config.environment, "Starting Keygate API Server");

    let keys = KeyRing::from_config(&config.auth.jwt).with_context(|| {
        format!("failed to load signing keys from {}", config.auth.jwt.keys_dir)
    })?;
    let token_config = TokenServiceConfig::from_jwt_config(&config.auth.jwt)
        .context("invalid JWT configuration")?;
    let token_service = Arc::new(TokenService::new(token_config, Arc::new(keys)));

    let user_store = Arc::new(
        InMemoryUserStore::with_demo_users(config.auth.password_hash_cost)
            .context("failed to build user store")?,
    );
    let rate_limiter = Arc::new(InMemoryRateLimiter::new(&config.rate_limit));
    let revocation_store = Arc::new(InMemoryRevocationStore::new());

    let auth_service = Arc::new(AuthService::new(
        user_store,
        rate_limiter,
        revocation_store,
        token_service,
    ));

    let app_state = web::Data::new(AppState::new(
        auth_service,
        config.server.trusted_proxy_header.clone(),
        &config.auth.privileged_roles,
    ));

    let bind_address = config.server.bind_address();
    tracing::info!(
        address = %bind_address,
        login_limit = config.rate_limit.login_limit,
        login_window_seconds = config.rate_limit.login_window_seconds,
        "Server will bind"
    );

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone()).wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
