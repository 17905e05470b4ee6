use std::sync::Arc;

use crate::store::{StoreError, User, UserStore};

/// Account management on top of a [`UserStore`].
pub struct UserService<S> {
    store: Arc<S>,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn first_user(&self) -> Result<Option<User>, StoreError> {
        self.store.first_user()
    }

    /// Look up a user by exact credentials. Store failures are logged and
    /// reported as no match.
    pub fn check_user(&self, username: &str, password: &str) -> Option<User> {
        match self.store.find_by_credentials(username, password) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Check user failed: {}", e);
                None
            }
        }
    }

    pub fn update_user(&self, id: i64, username: &str, password: &str) -> Result<(), StoreError> {
        self.store.update_user(id, username, password)
    }

    /// Set the credentials of the first account, creating it if the store is
    /// empty.
    pub fn update_first_user(&self, username: &str, password: &str) -> Result<User, StoreError> {
        if username.is_empty() {
            return Err(StoreError::Validation("username can not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(StoreError::Validation("password can not be empty".to_string()));
        }

        match self.store.first_user()? {
            Some(mut user) => {
                self.store.update_user(user.id, username, password)?;
                user.username = username.to_string();
                user.password = password.to_string();
                tracing::info!("Updated credentials for user {}", user.id);
                Ok(user)
            }
            None => {
                let user = self.store.create_user(username, password)?;
                tracing::info!("Created first user {} ({})", user.id, user.username);
                Ok(user)
            }
        }
    }
}
