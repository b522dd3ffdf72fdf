//! Route handlers
//!
//! - `auth` - Login and refresh token exchange
//! - `users` - Caller identity and user lookup
//! - `admin` - Administrative statistics
//! - `health` - Liveness probe

pub mod admin;
pub mod auth;
pub mod health;
pub mod users;
