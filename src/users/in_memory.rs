use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use uuid::Uuid;

use super::{User, UserRepository};
use crate::activation::HashedActivationRecord;
use crate::domain::ActivationEmail;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> Result<(), anyhow::Error> {
        self.lock()?.insert(user.user_id, user);
        Ok(())
    }

    pub fn get(&self, user_id: Uuid) -> Result<Option<User>, anyhow::Error> {
        Ok(self.lock()?.get(&user_id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, User>>, anyhow::Error> {
        self.users
            .lock()
            .map_err(|_| anyhow!("The user store lock was poisoned"))
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &ActivationEmail) -> Result<Option<User>, anyhow::Error> {
        Ok(self
            .lock()?
            .values()
            .find(|user| user.email == email.as_ref())
            .cloned())
    }

    async fn store_activation(
        &self,
        user_id: Uuid,
        record: &HashedActivationRecord,
    ) -> Result<(), anyhow::Error> {
        let mut users = self.lock()?;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| anyhow!("No user with id {}", user_id))?;
        user.email_verification_token = Some(record.email_verification_token.clone());
        user.email_verification_expiration = Some(record.email_verification_expiration);
        Ok(())
    }

    async fn complete_activation(
        &self,
        user_id: Uuid,
        verified_hash: &str,
    ) -> Result<bool, anyhow::Error> {
        let mut users = self.lock()?;
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(false);
        };
        if user.email_verification_token.as_deref() != Some(verified_hash) {
            return Ok(false);
        }
        user.email_verification_token = None;
        user.email_verification_expiration = None;
        user.is_active = true;
        Ok(true)
    }
}
