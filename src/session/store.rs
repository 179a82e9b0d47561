//! Lock-guarded session with a durable storage mirror.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use tracing::{debug, warn};

use super::state::{Session, SessionEvent};
use crate::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, SessionStorage, StorageError, USER_KEY};

/// Credentials and principal produced by a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub principal: Value,
}

struct Inner {
    session: Session,
    /// Bumped on every applied transition.
    revision: u64,
}

/// Single source of truth for the session. Mutations persist first, then
/// apply the matching [`SessionEvent`].
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    inner: RwLock<Inner>,
}

impl SessionStore {
    /// Create an empty, loading session over `storage`. Call
    /// [`SessionStore::hydrate`] before first use.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage, inner: RwLock::new(Inner { session: Session::default(), revision: 0 }) }
    }

    /// Restore the session persisted by an earlier run.
    ///
    /// A stored principal that does not parse (or parses to `null`) wipes
    /// every persisted session key. Loading is always cleared.
    pub fn hydrate(&self) {
        let mut inner = self.write();
        let access_token = self.storage.get(ACCESS_TOKEN_KEY);
        let user = self.storage.get(USER_KEY);

        if let (Some(access_token), Some(user)) = (access_token, user) {
            match serde_json::from_str::<Value>(&user) {
                Ok(principal) if !principal.is_null() => {
                    debug!("session restored from storage");
                    Self::transition(&mut inner, &SessionEvent::LoginSucceeded {
                        access_token,
                        refresh_token: self.storage.get(REFRESH_TOKEN_KEY),
                        principal,
                    });
                }
                Ok(_) | Err(_) => {
                    warn!("stored principal unreadable; discarding persisted session");
                    self.remove_persisted();
                }
            }
        }

        Self::transition(&mut inner, &SessionEvent::LoadingChanged(false));
    }

    /// Replace the whole session with a fresh login.
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects a write. Keys already written are
    /// restored to their previous values and the in-memory session is left
    /// unchanged.
    pub fn set(&self, grant: &LoginGrant) -> Result<(), StorageError> {
        let user = serde_json::to_string(&grant.principal)?;
        let mut inner = self.write();

        let previous: Vec<(&'static str, Option<String>)> =
            SESSION_KEYS.iter().map(|&key| (key, self.storage.get(key))).collect();
        if let Err(e) = self.persist_grant(grant, &user) {
            warn!(error = %e, "failed to persist login; restoring previous session keys");
            self.restore(&previous);
            return Err(e);
        }

        Self::transition(&mut inner, &SessionEvent::LoginSucceeded {
            access_token: grant.access_token.clone(),
            refresh_token: grant.refresh_token.clone(),
            principal: grant.principal.clone(),
        });
        Ok(())
    }

    /// Drop the session and every persisted key. Storage failures are logged.
    pub fn clear(&self) {
        let mut inner = self.write();
        self.remove_persisted();
        Self::transition(&mut inner, &SessionEvent::LoggedOut);
    }

    /// Replace the principal snapshot; tokens are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the principal cannot be serialized or persisted.
    pub fn update_principal(&self, principal: Value) -> Result<(), StorageError> {
        let user = serde_json::to_string(&principal)?;
        let mut inner = self.write();
        self.storage.set(USER_KEY, &user)?;
        Self::transition(&mut inner, &SessionEvent::PrincipalUpdated(principal));
        Ok(())
    }

    /// Store refreshed tokens only if no transition happened since
    /// `expected_revision`. Returns `false` and writes nothing otherwise.
    pub(crate) fn store_refreshed(
        &self,
        expected_revision: u64,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<bool, StorageError> {
        let mut inner = self.write();
        if inner.revision != expected_revision {
            return Ok(false);
        }

        self.storage.set(ACCESS_TOKEN_KEY, access_token)?;
        if let Some(refresh_token) = refresh_token {
            self.storage.set(REFRESH_TOKEN_KEY, refresh_token)?;
        }
        Self::transition(&mut inner, &SessionEvent::TokensRefreshed {
            access_token: access_token.to_owned(),
            refresh_token: refresh_token.map(str::to_owned),
        });
        Ok(true)
    }

    pub(crate) fn set_loading(&self, is_loading: bool) {
        let mut inner = self.write();
        Self::transition(&mut inner, &SessionEvent::LoadingChanged(is_loading));
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read().session.clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read().session.access_token.clone()
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read().session.refresh_token.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_authenticated()
    }

    /// Count of transitions applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    fn transition(inner: &mut Inner, event: &SessionEvent) {
        let current = std::mem::take(&mut inner.session);
        inner.session = current.apply(event);
        inner.revision += 1;
    }

    // Mutations hold the write guard across their storage writes so storage
    // and memory change together.
    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_grant(&self, grant: &LoginGrant, user: &str) -> Result<(), StorageError> {
        self.storage.set(ACCESS_TOKEN_KEY, &grant.access_token)?;
        match &grant.refresh_token {
            Some(refresh_token) => self.storage.set(REFRESH_TOKEN_KEY, refresh_token)?,
            None => self.storage.remove(REFRESH_TOKEN_KEY)?,
        }
        self.storage.set(USER_KEY, user)
    }

    fn restore(&self, previous: &[(&'static str, Option<String>)]) {
        for (key, value) in previous {
            let result = match value {
                Some(value) => self.storage.set(key, value),
                None => self.storage.remove(key),
            };
            if let Err(e) = result {
                warn!(key, error = %e, "failed to restore persisted session key");
            }
        }
    }

    fn remove_persisted(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to remove persisted session key");
            }
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
