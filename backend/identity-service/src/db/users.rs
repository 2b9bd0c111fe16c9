/// User store boundary for identity-service
use crate::error::{IdentityError, Result};
use crate::models::{Identity, NewUser};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lookup and persistence of user records, owned by the host application.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>>;

    /// Persist a new user, rejecting duplicate usernames and emails
    async fn create(&self, user: NewUser) -> Result<Identity>;
}

/// Process-local user store keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, Identity>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing record, replacing any user with the same username.
    pub async fn insert(&self, identity: Identity) {
        self.users
            .write()
            .await
            .insert(identity.username.clone(), identity);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<Identity> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(IdentityError::UsernameAlreadyExists);
        }
        if users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(IdentityError::EmailAlreadyExists);
        }

        let identity = Identity {
            user_id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.insert(identity.username.clone(), identity.clone());

        Ok(identity)
    }
}
