use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No valid session is attached to the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The session map could not be written.
    #[error("session store unavailable: {0}")]
    SessionStore(String),

    /// The password hash could not be produced or parsed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Hash(value.to_string())
    }
}
