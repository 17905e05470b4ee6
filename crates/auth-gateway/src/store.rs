use serde::Serialize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User {0} not found")]
    NotFound(i64),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Credential storage the gateway checks logins against.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for the
/// store itself failing.
pub trait UserStore: Send + Sync {
    fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<User>, StoreError>;
    fn first_user(&self) -> Result<Option<User>, StoreError>;
    fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError>;
    fn update_user(&self, id: i64, username: &str, password: &str) -> Result<(), StoreError>;
}

/// Process-local user table.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<User>>, StoreError> {
        self.users
            .read()
            .map_err(|_| StoreError::Backend("user table lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<User>>, StoreError> {
        self.users
            .write()
            .map_err(|_| StoreError::Backend("user table lock poisoned".to_string()))
    }
}

impl UserStore for MemoryUserStore {
    fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .iter()
            .find(|u| u.username == username && u.password == password)
            .cloned())
    }

    fn first_user(&self) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.first().cloned())
    }

    fn create_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let mut users = self.write()?;
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            username: username.to_string(),
            password: password.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    fn update_user(&self, id: i64, username: &str, password: &str) -> Result<(), StoreError> {
        let mut users = self.write()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound(id))?;
        user.username = username.to_string();
        user.password = password.to_string();
        Ok(())
    }
}
