//! Session gate: login, logout and session lookup.
//!
//! bcrypt is CPU-bound, so hashing and verification run on the blocking
//! pool instead of an async worker.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use sims_auth::{hash_password, AuthError, Session, SessionId, SessionStore, DEFAULT_COST};

use crate::config::BootstrapUser;
use crate::error::ServiceError;
use crate::store::UserDirectory;

#[derive(Clone)]
pub struct SessionGate {
    users: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    ttl: Duration,
    hash_cost: u32,
}

impl SessionGate {
    pub fn new(users: Arc<dyn UserDirectory>, sessions: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self {
            users,
            sessions,
            ttl,
            hash_cost: DEFAULT_COST,
        }
    }

    /// bcrypt cost used when creating accounts.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        self.ttl
    }

    /// Check credentials and open a session.
    ///
    /// Unknown users and wrong passwords both fail with
    /// `AuthError::InvalidCredentials`.
    #[instrument(skip(self, password), err)]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ServiceError> {
        let Some(account) = self.users.find_by_username(username).await? else {
            warn!("login failed: unknown user");
            return Err(AuthError::InvalidCredentials.into());
        };

        let password = password.to_string();
        let candidate = account.clone();
        let verified = tokio::task::spawn_blocking(move || candidate.verify(&password))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))??;
        if !verified {
            warn!("login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let session = Session::issue(account.id, account.username, Utc::now(), self.ttl);
        self.sessions.insert(session.clone())?;
        info!(user_id = %session.user_id, "session opened");
        Ok(session)
    }

    /// Destroy a session. Returns whether one existed.
    pub fn logout(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id);
        if removed {
            info!("session closed");
        }
        removed
    }

    /// The live session for `id`, if any. Expired sessions are dropped here.
    pub fn check(&self, id: &SessionId) -> Option<Session> {
        self.sessions.get(id, Utc::now())
    }

    /// Create the configured bootstrap account unless the username is taken.
    #[instrument(skip(self, user), fields(username = %user.username), err)]
    pub async fn ensure_bootstrap_user(&self, user: &BootstrapUser) -> Result<(), ServiceError> {
        if self.users.find_by_username(&user.username).await?.is_some() {
            return Ok(());
        }

        let password = user.password.clone();
        let cost = self.hash_cost;
        let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))??;
        let account = self.users.create_user(&user.username, &hash).await?;
        info!(user_id = %account.id, "bootstrap user created");
        Ok(())
    }
}
