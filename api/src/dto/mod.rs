pub mod auth;
pub mod user;

pub use auth::{LoginRequest, RefreshTokenRequest, TokenPairResponse};
pub use user::{HealthResponse, StatsResponse, UserResponse};
