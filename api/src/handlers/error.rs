//! Conversion of domain failures into HTTP error responses
//!
//! Every failing endpoint answers with `{"error": code, "details"?: text}`.
//! The code and status for each domain failure are fixed here; anything
//! internal is reported with a generic message and logged in full.

use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use kg_core::errors::{AuthError, DomainError, TokenError};
use kg_shared::{error_codes, ErrorResponse};

/// Error returned by handlers and the auth guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, details: impl Into<String>) -> Self {
        Self {
            status,
            code,
            details: Some(details.into()),
        }
    }

    pub fn bad_request(code: &'static str, details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, details)
    }

    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED, details)
    }

    pub fn forbidden(details: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error_codes::FORBIDDEN, details)
    }

    /// 500 with a message that reveals nothing about the cause
    pub fn internal(code: &'static str) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            code,
            "internal error, see server logs",
        )
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.code, details),
            None => f.write_str(self.code),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let body = match &self.details {
            Some(details) => ErrorResponse::with_details(self.code, details.clone()),
            None => ErrorResponse::new(self.code),
        };
        HttpResponse::build(self.status).json(body)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_CREDENTIALS,
                "wrong email or password",
            ),
            AuthError::TooManyAttempts => Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                error_codes::TOO_MANY_ATTEMPTS,
                "too many login attempts from this client, please try later",
            ),
            AuthError::RefreshRevoked => Self::new(
                StatusCode::UNAUTHORIZED,
                error_codes::REFRESH_REVOKED,
                "refresh token has been revoked",
            ),
            AuthError::InvalidRefresh { .. } => Self::new(
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_REFRESH,
                "cannot parse refresh token",
            ),
            AuthError::InvalidRefreshType => Self::new(
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_REFRESH_TYPE,
                "expected refresh token",
            ),
            AuthError::Unauthorized { reason } => Self::unauthorized(reason),
            AuthError::Forbidden { reason } => Self::forbidden(reason),
            AuthError::ClaimsMissing => {
                tracing::error!("Handler reached without the auth guard");
                Self::internal(error_codes::CLAIMS_MISSING)
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Auth(auth) => auth.into(),
            DomainError::NotFound { resource } => {
                tracing::debug!(resource = %resource, "Resource not found");
                Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, "user not found")
            }
            DomainError::Token(token) => {
                match &token {
                    TokenError::SigningFailed { .. }
                    | TokenError::KeyLoadError { .. }
                    | TokenError::UnknownKey { .. } => {
                        tracing::error!(error = %token, "Token signing failed");
                    }
                    _ => tracing::error!(error = %token, "Unexpected token error"),
                }
                Self::internal(error_codes::TOKEN_ERROR)
            }
            DomainError::Internal { message } => {
                tracing::error!(error = %message, "Internal failure");
                Self::internal(error_codes::TOKEN_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode, &str)> = vec![
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED, "invalid_credentials"),
            (AuthError::TooManyAttempts.into(), StatusCode::TOO_MANY_REQUESTS, "too_many_attempts"),
            (AuthError::RefreshRevoked.into(), StatusCode::UNAUTHORIZED, "refresh_revoked"),
            (
                AuthError::InvalidRefresh { reason: "x".into() }.into(),
                StatusCode::UNAUTHORIZED,
                "invalid_refresh",
            ),
            (AuthError::InvalidRefreshType.into(), StatusCode::UNAUTHORIZED, "invalid_refresh_type"),
            (AuthError::ClaimsMissing.into(), StatusCode::INTERNAL_SERVER_ERROR, "claims_missing"),
            (
                DomainError::NotFound { resource: "user 9".into() },
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                TokenError::SigningFailed { message: "boom".into() }.into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
            ),
        ];

        for (error, status, code) in cases {
            let api: ApiError = error.into();
            assert_eq!(api.status_code(), status, "{}", code);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn test_internal_details_are_generic() {
        let api: ApiError = DomainError::Token(TokenError::KeyLoadError {
            message: "/secret/path/key.pem missing".into(),
        })
        .into();
        assert!(!api.details().unwrap_or_default().contains("/secret"));
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let response = ApiError::forbidden("role user not allowed").error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "forbidden", "details": "role user not allowed"})
        );
    }
}
