use actix_web::{web, HttpResponse};
use validator::Validate;

use kg_core::repositories::UserStore;
use kg_core::services::auth::{RateLimiterTrait, RevocationStoreTrait};
use kg_shared::error_codes;

use crate::app::AppState;
use crate::dto::{RefreshTokenRequest, TokenPairResponse};
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is revoked
/// and cannot be exchanged again.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 400 `invalid_refresh`: Missing `refresh_token`
/// - 401 `refresh_revoked`: Token already exchanged
/// - 401 `invalid_refresh`: Token fails verification
/// - 401 `invalid_refresh_type`: An access token was presented
/// - 500 `token_error`: Signing failure
pub async fn refresh<U, R, V>(
    state: web::Data<AppState<U, R, V>>,
    body: Result<web::Json<RefreshTokenRequest>, actix_web::Error>,
) -> Result<HttpResponse, ApiError>
where
    U: UserStore + 'static,
    R: RateLimiterTrait + 'static,
    V: RevocationStoreTrait + 'static,
{
    let missing = || {
        ApiError::bad_request(error_codes::INVALID_REFRESH, "refresh_token is required")
    };
    let request = body.map_err(|_| missing())?.into_inner();
    request.validate().map_err(|_| missing())?;

    let pair = state.auth_service.refresh(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(TokenPairResponse::from(pair)))
}
