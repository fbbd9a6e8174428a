use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use crate::domain::auth::{
  entities::User, errors::AuthError, ports::UserRepository, value_objects::Username,
};

/// Process-local credential store
///
/// Records live only as long as the process. Readers share the lock;
/// a save holds it exclusively for the single map insert.
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of stored records
  pub async fn len(&self) -> usize {
    self.users.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.users.read().await.is_empty()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn save(&self, user: User) -> Result<(), AuthError> {
    let mut users = self.users.write().await;
    users.insert(user.username.clone(), user);
    Ok(())
  }

  async fn insert_new(&self, user: User) -> Result<bool, AuthError> {
    let mut users = self.users.write().await;
    match users.entry(user.username.clone()) {
      Entry::Occupied(_) => Ok(false),
      Entry::Vacant(slot) => {
        slot.insert(user);
        Ok(true)
      }
    }
  }

  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
    let users = self.users.read().await;
    Ok(users.get(username.as_str()).cloned())
  }
}
