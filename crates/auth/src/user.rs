use serde::{Deserialize, Serialize};

use sims_core::UserId;

/// Stored user account (a `users` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

impl UserAccount {
    pub fn verify(&self, password: &str) -> Result<bool, crate::AuthError> {
        crate::verify_password(password, &self.password_hash)
    }
}
