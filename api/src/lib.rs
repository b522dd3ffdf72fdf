//! HTTP surface of the Keygate authentication service
//!
//! Library exports are used by the binary and by the integration tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
