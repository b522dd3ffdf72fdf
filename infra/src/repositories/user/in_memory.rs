//! bcrypt-backed in-memory user store seeded with demo accounts

use async_trait::async_trait;

use kg_core::domain::entities::user::{Role, UserRecord};
use kg_core::errors::{AuthError, DomainError};
use kg_core::repositories::UserStore;

use crate::InfrastructureError;

/// Password shared by the demo accounts
pub const DEMO_PASSWORD: &str = "secret123";

/// Verified against when the email is unknown, so both failure paths hash
const DUMMY_PASSWORD: &str = "keygate-dummy-password";

struct StoredUser {
    record: UserRecord,
    password_hash: String,
}

/// Immutable user store holding bcrypt password hashes
pub struct InMemoryUserStore {
    users: Vec<StoredUser>,
    dummy_hash: String,
}

impl InMemoryUserStore {
    /// Builds a store from plain-text credentials, hashing each password
    ///
    /// # Arguments
    ///
    /// * `credentials` - Records paired with their plain-text passwords
    /// * `cost` - bcrypt cost factor
    pub fn from_credentials(
        credentials: Vec<(UserRecord, &str)>,
        cost: u32,
    ) -> Result<Self, InfrastructureError> {
        let mut users: Vec<StoredUser> = Vec::with_capacity(credentials.len());

        for (record, password) in credentials {
            if users
                .iter()
                .any(|u| u.record.id == record.id || u.record.email == record.email)
            {
                return Err(InfrastructureError::Config(format!(
                    "Duplicate user id or email: {} ({})",
                    record.id, record.email
                )));
            }
            users.push(StoredUser {
                password_hash: bcrypt::hash(password, cost)?,
                record,
            });
        }

        Ok(Self {
            users,
            dummy_hash: bcrypt::hash(DUMMY_PASSWORD, cost)?,
        })
    }

    /// Store with `admin@example.com` (id 1) and `user@example.com` (id 2)
    pub fn with_demo_users(cost: u32) -> Result<Self, InfrastructureError> {
        let store = Self::from_credentials(
            vec![
                (UserRecord::new(1, "admin@example.com", Role::Admin), DEMO_PASSWORD),
                (UserRecord::new(2, "user@example.com", Role::User), DEMO_PASSWORD),
            ],
            cost,
        )?;
        tracing::info!(users = store.users.len(), "Demo user store ready");
        Ok(store)
    }

    fn find_by_email(&self, email: &str) -> Option<&StoredUser> {
        self.users.iter().find(|u| u.record.email == email)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn check_password(&self, email: &str, password: &str) -> Result<UserRecord, DomainError> {
        let user = self.find_by_email(email);
        let hash = user
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let password = password.to_string();

        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Stored password hash is unusable");
                DomainError::Internal {
                    message: format!("Password verification failed: {}", e),
                }
            })?;

        match user {
            Some(user) if matches => Ok(user.record.clone()),
            _ => Err(AuthError::InvalidCredentials.into()),
        }
    }

    async fn by_id(&self, id: i64) -> Result<Option<UserRecord>, DomainError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.record.id == id)
            .map(|u| u.record.clone()))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.users.len())
    }
}
