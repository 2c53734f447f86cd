//! `sims-auth`: session and credential boundary.
//!
//! This crate is intentionally decoupled from HTTP and from the database:
//! cookie transport lives in the API, user lookup behind `UserDirectory` in
//! infra.

pub mod error;
pub mod password;
pub mod session;
pub mod store;
pub mod user;

pub use error::AuthError;
pub use password::{hash_password, verify_password, DEFAULT_COST};
pub use session::{validate_session, Session, SessionId, SessionValidationError};
pub use store::{InMemorySessionStore, SessionStore};
pub use user::UserAccount;
