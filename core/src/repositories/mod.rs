//! Interfaces to collaborators owned outside the authentication core.

pub mod user;

pub use user::UserStore;
