use core::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use sims_core::UserId;

/// Opaque session identifier carried in the session cookie.
///
/// Random (UUIDv4) so it cannot be guessed from other sessions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.simple(), f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Server-held record binding a cookie to an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh session; the lifetime runs from issuance and is not
    /// extended by use.
    pub fn issue(user_id: UserId, username: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            username: username.into(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    #[error("session has expired")]
    Expired,

    #[error("session not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate a session's time window against `now`.
pub fn validate_session(session: &Session, now: DateTime<Utc>) -> Result<(), SessionValidationError> {
    if session.expires_at <= session.issued_at {
        return Err(SessionValidationError::InvalidTimeWindow);
    }
    if now < session.issued_at {
        return Err(SessionValidationError::NotYetValid);
    }
    if now >= session.expires_at {
        return Err(SessionValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_valid_inside_window() {
        let now = Utc::now();
        let s = Session::issue(UserId::new(1), "admin", now, Duration::hours(24));
        assert_eq!(validate_session(&s, now + Duration::hours(23)), Ok(()));
    }

    #[test]
    fn session_expires_after_ttl() {
        let now = Utc::now();
        let s = Session::issue(UserId::new(1), "admin", now, Duration::hours(24));
        assert_eq!(
            validate_session(&s, now + Duration::hours(24)),
            Err(SessionValidationError::Expired)
        );
    }

    #[test]
    fn zero_ttl_is_an_invalid_window() {
        let now = Utc::now();
        let s = Session::issue(UserId::new(1), "admin", now, Duration::zero());
        assert_eq!(validate_session(&s, now), Err(SessionValidationError::InvalidTimeWindow));
    }

    #[test]
    fn session_id_round_trips_through_its_cookie_form() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
