//! Identity and user lookup handlers, both behind the auth guard

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};

use kg_core::domain::entities::token::Claims;
use kg_core::repositories::UserStore;
use kg_core::services::auth::{RateLimiterTrait, RevocationStoreTrait};
use kg_shared::error_codes;

use crate::app::AppState;
use crate::dto::UserResponse;
use crate::handlers::error::ApiError;

/// Handler for GET /api/v1/me
///
/// Returns the identity carried by the caller's access token.
pub async fn me<U, R, V>(
    req: HttpRequest,
    state: web::Data<AppState<U, R, V>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserStore + 'static,
    R: RateLimiterTrait + 'static,
    V: RevocationStoreTrait + 'static,
{
    let identity = state.auth_service.identity(req.extensions().get::<Claims>())?;
    Ok(HttpResponse::Ok().json(UserResponse::from(identity)))
}

/// Handler for GET /api/v1/users/{id}
///
/// Ownership is enforced by the guard; users reach only their own record.
pub async fn user_by_id<U, R, V>(
    req: HttpRequest,
    state: web::Data<AppState<U, R, V>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError>
where
    U: UserStore + 'static,
    R: RateLimiterTrait + 'static,
    V: RevocationStoreTrait + 'static,
{
    state.auth_service.identity(req.extensions().get::<Claims>())?;

    let id: i64 = path
        .parse()
        .map_err(|_| ApiError::bad_request(error_codes::BAD_ID, "id must be integer"))?;

    let user = state.auth_service.user_by_id(id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
