pub mod auth;
pub mod client_ip;
pub mod rejection_log;

pub use auth::AuthGuard;
pub use client_ip::client_id;
pub use rejection_log::RejectionLog;
