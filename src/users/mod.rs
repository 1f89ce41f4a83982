mod in_memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::activation::{HashedActivationRecord, PendingActivation};
use crate::domain::ActivationEmail;

pub use in_memory::InMemoryUserRepository;

/// The slice of a user account the activation flow reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub email_verification_token: Option<String>,
    pub email_verification_expiration: Option<DateTime<Utc>>,
}

impl User {
    /// A fresh, inactive account with nothing issued yet.
    pub fn new(email: &ActivationEmail) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            email: email.as_ref().to_string(),
            is_active: false,
            email_verification_token: None,
            email_verification_expiration: None,
        }
    }
}

impl PendingActivation for User {
    fn email_verification_token(&self) -> Option<&str> {
        self.email_verification_token.as_deref()
    }

    fn email_verification_expiration(&self) -> Option<DateTime<Utc>> {
        self.email_verification_expiration
    }
}

/// Persistence owned by the surrounding application.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &ActivationEmail) -> Result<Option<User>, anyhow::Error>;

    /// Overwrites whatever record the user had.
    async fn store_activation(
        &self,
        user_id: Uuid,
        record: &HashedActivationRecord,
    ) -> Result<(), anyhow::Error>;

    /// Clears the record and activates the user, but only while the stored hash is
    /// still `verified_hash`. Returns `false` if it was cleared or re-issued meanwhile.
    async fn complete_activation(
        &self,
        user_id: Uuid,
        verified_hash: &str,
    ) -> Result<bool, anyhow::Error>;
}
