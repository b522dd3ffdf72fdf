use actix_web::{web, HttpResponse};

use kg_core::repositories::UserStore;
use kg_core::services::auth::{RateLimiterTrait, RevocationStoreTrait};

use crate::app::AppState;
use crate::dto::StatsResponse;
use crate::handlers::error::ApiError;

/// Handler for GET /api/v1/admin/stats (admin only)
pub async fn stats<U, R, V>(
    state: web::Data<AppState<U, R, V>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserStore + 'static,
    R: RateLimiterTrait + 'static,
    V: RevocationStoreTrait + 'static,
{
    let response = StatsResponse {
        users: state.auth_service.user_count().await?,
        revoked_refresh_tokens: state.auth_service.revoked_refresh_count().await?,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}
