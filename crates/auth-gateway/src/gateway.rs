use lockout_tracker::LockoutTracker;
use std::sync::Arc;

use crate::store::{StoreError, User, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Too many failed attempts, try again later")]
    Locked,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Credential check guarded by the lockout tracker.
///
/// Every attempt that does not end in a matched user counts as a failure,
/// including lookups the store could not answer, so probing for unknown
/// usernames is throttled the same way as guessing passwords.
pub struct AuthGateway<S> {
    tracker: Arc<LockoutTracker>,
    store: Arc<S>,
}

impl<S: UserStore> AuthGateway<S> {
    pub fn new(tracker: Arc<LockoutTracker>, store: Arc<S>) -> Self {
        Self { tracker, store }
    }

    pub fn tracker(&self) -> &LockoutTracker {
        &self.tracker
    }

    pub fn login(&self, username: &str, password: &str) -> Result<User, LoginError> {
        if !self.tracker.can_attempt(username) {
            tracing::warn!("Login rejected for {}: locked out", username);
            return Err(LoginError::Locked);
        }

        match self.store.find_by_credentials(username, password) {
            Ok(Some(user)) => {
                self.tracker.reset_failures(username);
                tracing::info!("Login succeeded for {}", username);
                Ok(user)
            }
            Ok(None) => {
                self.tracker.record_failure(username);
                Err(LoginError::InvalidCredentials)
            }
            Err(e) => {
                tracing::warn!("Credential lookup for {} failed: {}", username, e);
                self.tracker.record_failure(username);
                Err(e.into())
            }
        }
    }
}
