//! Shared error response structure and error codes

use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint
///
/// The body carries no timestamp or request-specific data so that two
/// rejections with the same code and details serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification (see [`error_codes`])
    pub error: String,

    /// Human-readable explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create an error response with only a code
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Create an error response with a code and details
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Error codes used in [`ErrorResponse::error`]
pub mod error_codes {
    pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const TOO_MANY_ATTEMPTS: &str = "too_many_attempts";
    pub const INVALID_REFRESH: &str = "invalid_refresh";
    pub const INVALID_REFRESH_TYPE: &str = "invalid_refresh_type";
    pub const REFRESH_REVOKED: &str = "refresh_revoked";
    pub const TOKEN_ERROR: &str = "token_error";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const BAD_ID: &str = "bad_id";
    pub const CLAIMS_MISSING: &str = "claims_missing";
}
