//! Session credential
//!
//! The bearer token (and the user it belongs to) lives in local storage.
//! `Session` is the only reader and writer of those keys; the API client
//! and the navigation guard receive it explicitly instead of reaching into
//! storage themselves.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{LoginResponse, User};
use crate::storage::{KeyValueStore, StorageResult, TOKEN_KEY, USER_KEY};

/// Handle to the persisted session credential
///
/// Cloning is cheap; clones share the same storage.
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Current bearer token, if any
    ///
    /// Read from storage on every call. An empty token counts as absent.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// The signed-in user, if one was stored alongside the token
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring unreadable stored user: {}", e);
                None
            }
        }
    }

    /// Presence of a token is the only signal of being signed in
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist the result of a successful login
    pub fn establish(&self, login: &LoginResponse) -> StorageResult<()> {
        let user = serde_json::to_string(&login.user)?;
        self.storage.set(TOKEN_KEY, &login.token)?;
        self.storage.set(USER_KEY, &user)?;
        debug!("Session established for {}", login.user.email);
        Ok(())
    }

    /// Persist a bare token without user details
    pub fn set_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.remove(USER_KEY)
    }

    /// Forget the credential (logout)
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        debug!("Session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
