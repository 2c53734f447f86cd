//! Configuration loading and representation.
//!
//! Values come from environment variables (see [`AppConfig::from_env`]).
//! Parsing goes through a lookup function so tests never touch the process
//! environment.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
pub const DEFAULT_BCRYPT_COST: u32 = sims_auth::DEFAULT_COST;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be set: {reason}")]
    Missing { key: &'static str, reason: &'static str },

    #[error("invalid value for {key} ({value:?}): {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which storage backend the process uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local maps (dev/test). Data is lost on exit.
    InMemory,
    /// PostgreSQL via `DATABASE_URL`.
    Postgres { database_url: String },
}

/// User created at startup when no account with that name exists yet.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapUser {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    /// The single browser origin allowed to make credentialed requests.
    pub frontend_origin: String,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub bootstrap_user: Option<BootstrapUser>,
    /// bcrypt cost for newly hashed passwords.
    pub bcrypt_cost: u32,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (key -> value).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = {
            let raw = get("SIMS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
            raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
                key: "SIMS_BIND_ADDR",
                value: raw.clone(),
                reason: e.to_string(),
            })?
        };

        let use_persistent = parse_bool("USE_PERSISTENT_STORES", get("USE_PERSISTENT_STORES"))?;
        let storage = if use_persistent {
            let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing {
                key: "DATABASE_URL",
                reason: "required when USE_PERSISTENT_STORES=true",
            })?;
            StorageConfig::Postgres { database_url }
        } else {
            StorageConfig::InMemory
        };

        let frontend_origin =
            get("SIMS_FRONTEND_ORIGIN").unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string());

        let session_ttl = match get("SIMS_SESSION_TTL_HOURS") {
            None => Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 => Duration::hours(hours),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SIMS_SESSION_TTL_HOURS",
                        value: raw,
                        reason: "expected a positive number of hours".to_string(),
                    });
                }
            },
        };

        let cookie_secure = parse_bool("SIMS_COOKIE_SECURE", get("SIMS_COOKIE_SECURE"))?;

        let bootstrap_user = match (get("SIMS_ADMIN_USERNAME"), lookup("SIMS_ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !password.is_empty() => {
                Some(BootstrapUser { username, password })
            }
            (None, None) => None,
            _ => {
                return Err(ConfigError::Missing {
                    key: "SIMS_ADMIN_PASSWORD",
                    reason: "SIMS_ADMIN_USERNAME and SIMS_ADMIN_PASSWORD must be set together",
                });
            }
        };

        let bcrypt_cost = match get("SIMS_BCRYPT_COST") {
            None => DEFAULT_BCRYPT_COST,
            Some(raw) => match raw.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "SIMS_BCRYPT_COST",
                        value: raw,
                        reason: "expected an integer between 4 and 31".to_string(),
                    });
                }
            },
        };

        Ok(Self {
            bind_addr,
            storage,
            frontend_origin,
            session_ttl,
            cookie_secure,
            bootstrap_user,
            bcrypt_cost,
        })
    }
}

fn parse_bool(key: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw {
        None => Ok(false),
        Some(v) => match v.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: v,
                reason: "expected true or false".to_string(),
            }),
        },
    }
}
