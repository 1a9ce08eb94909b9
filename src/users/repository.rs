//! User persistence boundary.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::users::model::User;

/// Store for user entities, keyed by upper-cased user id.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn all(&self) -> Vec<User>;

    async fn find(&self, user_id: &str) -> Option<User>;

    async fn insert(&self, user: User) -> User;

    async fn update(&self, user: User) -> User;

    /// Soft delete: deactivates the user, keeping the row for audit joins.
    /// Returns `false` when the user does not exist.
    async fn deactivate(&self, user_id: &str) -> bool;
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: DashMap<String, User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn all(&self) -> Vec<User> {
        self.users
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn find(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|entry| entry.value().clone())
    }

    async fn insert(&self, user: User) -> User {
        self.users.insert(user.user_id.clone(), user.clone());
        user
    }

    async fn update(&self, user: User) -> User {
        self.users.insert(user.user_id.clone(), user.clone());
        user
    }

    async fn deactivate(&self, user_id: &str) -> bool {
        match self.users.get_mut(user_id) {
            Some(mut entry) => {
                entry.is_active = false;
                true
            }
            None => false,
        }
    }
}
