//! Error types for authentication, authorization and token management
//!
//! The HTTP layer maps each variant onto a fixed error code and status;
//! the messages here are for server-side logs.

use thiserror::Error;

/// Authentication and authorization failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Too many login attempts")]
    TooManyAttempts,

    #[error("Refresh token has been revoked")]
    RefreshRevoked,

    #[error("Invalid refresh token: {reason}")]
    InvalidRefresh { reason: String },

    #[error("Expected a refresh token")]
    InvalidRefreshType,

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// The authorization guard did not run before the handler
    #[error("Validated claims missing from request context")]
    ClaimsMissing,
}

/// Token signing and verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Unknown or retired kid, or the signature does not verify
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Unexpected signing algorithm: {found}")]
    UnexpectedAlgorithm { found: String },

    #[error("Token expired")]
    Expired,

    #[error("Audience or issuer mismatch")]
    AudienceOrIssuerMismatch,

    #[error("Malformed token")]
    Malformed,

    #[error("Token signing failed: {message}")]
    SigningFailed { message: String },

    #[error("Key load error: {message}")]
    KeyLoadError { message: String },

    #[error("Unknown key id: {kid}")]
    UnknownKey { kid: String },
}
