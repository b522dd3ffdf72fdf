//! Concrete user storage

pub mod user;

pub use user::{InMemoryUserStore, DEMO_PASSWORD};
