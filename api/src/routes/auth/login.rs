use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use kg_core::repositories::UserStore;
use kg_core::services::auth::{RateLimiterTrait, RevocationStoreTrait};
use kg_shared::error_codes;

use crate::app::AppState;
use crate::dto::{LoginRequest, TokenPairResponse};
use crate::handlers::error::ApiError;
use crate::middleware::client_id;

/// Handler for POST /api/v1/login
///
/// The attempt is counted against the client before the body is examined,
/// so malformed requests use up the window as well.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "user@example.com",
///     "password": "secret123"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 400 `invalid_credentials`: Missing email or password
/// - 401 `invalid_credentials`: Unknown email or wrong password
/// - 429 `too_many_attempts`: Login limit for this client reached
/// - 500 `token_error`: Signing failure
pub async fn login<U, R, V>(
    req: HttpRequest,
    state: web::Data<AppState<U, R, V>>,
    body: Result<web::Json<LoginRequest>, actix_web::Error>,
) -> Result<HttpResponse, ApiError>
where
    U: UserStore + 'static,
    R: RateLimiterTrait + 'static,
    V: RevocationStoreTrait + 'static,
{
    let client = client_id(&req, &state.trusted_proxy_header);
    state.auth_service.admit_login(&client).await?;

    let missing = || {
        ApiError::bad_request(error_codes::INVALID_CREDENTIALS, "email and password are required")
    };
    let request = body.map_err(|_| missing())?.into_inner();
    request.validate().map_err(|_| missing())?;

    let pair = state
        .auth_service
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(TokenPairResponse::from(pair)))
}
