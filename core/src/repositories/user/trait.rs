//! User store trait defining the interface the core needs from the
//! collaborator that owns user records and password policy.

use async_trait::async_trait;

use crate::domain::entities::user::UserRecord;
use crate::errors::DomainError;

/// Read-only access to user records and credential checks
///
/// Implementations own persistence and password hashing. The core never
/// mutates records and only relies on the three operations below.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use kg_core::repositories::UserStore;
/// use kg_core::domain::entities::user::{Role, UserRecord};
/// use kg_core::errors::{AuthError, DomainError};
///
/// struct SingleUserStore;
///
/// #[async_trait]
/// impl UserStore for SingleUserStore {
///     async fn check_password(&self, email: &str, password: &str) -> Result<UserRecord, DomainError> {
///         if email == "admin@example.com" && password == "secret123" {
///             Ok(UserRecord::new(1, email, Role::Admin))
///         } else {
///             Err(AuthError::InvalidCredentials.into())
///         }
///     }
///
///     async fn by_id(&self, id: i64) -> Result<Option<UserRecord>, DomainError> {
///         Ok((id == 1).then(|| UserRecord::new(1, "admin@example.com", Role::Admin)))
///     }
///
///     async fn count(&self) -> Result<usize, DomainError> {
///         Ok(1)
///     }
/// }
/// ```
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Verify credentials and return the matching record
    ///
    /// # Returns
    /// * `Ok(UserRecord)` - Email known and password correct
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Unknown email or wrong password
    /// * `Err(DomainError)` - Any other store failure
    async fn check_password(&self, email: &str, password: &str) -> Result<UserRecord, DomainError>;

    /// Find a user by their identifier
    ///
    /// # Returns
    /// * `Ok(Some(UserRecord))` - User found
    /// * `Ok(None)` - No user with that id
    async fn by_id(&self, id: i64) -> Result<Option<UserRecord>, DomainError>;

    /// Number of stored users
    async fn count(&self) -> Result<usize, DomainError>;
}
