use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::error::AuthError;
use crate::session::{validate_session, Session, SessionId};

/// Server-side session map.
///
/// Expiry is enforced lazily: an expired session is dropped when it is next
/// looked up. There is no background sweeper.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: Session) -> Result<(), AuthError>;

    /// Return the session if it exists and is valid at `now`.
    fn get(&self, id: &SessionId, now: DateTime<Utc>) -> Option<Session>;

    /// Destroy a session. Returns whether one existed.
    fn remove(&self, id: &SessionId) -> bool;
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: Session) -> Result<(), AuthError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| AuthError::SessionStore("session lock poisoned".to_string()))?;
        map.insert(session.id, session);
        Ok(())
    }

    fn get(&self, id: &SessionId, now: DateTime<Utc>) -> Option<Session> {
        let session = self.inner.read().ok()?.get(id).cloned()?;
        match validate_session(&session, now) {
            Ok(()) => Some(session),
            Err(reason) => {
                tracing::debug!(session_id = %id, %reason, "dropping invalid session");
                self.remove(id);
                None
            }
        }
    }

    fn remove(&self, id: &SessionId) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(id).is_some(),
            Err(_) => false,
        }
    }
}
