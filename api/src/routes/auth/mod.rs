//! Authentication route handlers
//!
//! This module contains the credential exchange endpoints:
//! - Login with email and password
//! - Refresh token rotation

pub mod login;
pub mod refresh;

pub use login::login;
pub use refresh::refresh;
