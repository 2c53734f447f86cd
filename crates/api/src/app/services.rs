use std::sync::Arc;

use chrono::Duration;

use sims_auth::{InMemorySessionStore, SessionStore};
use sims_infra::{
    AppConfig, InMemoryInventoryStore, InMemoryUserDirectory, InventoryStore, PartCatalog,
    PostgresStore, ReportProjector, ServiceError, SessionGate, StockLedger, StorageConfig,
    UserDirectory,
};

/// Services shared by every handler. Built once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: PartCatalog,
    pub ledger: StockLedger,
    pub reports: ReportProjector,
    pub gate: SessionGate,
    pub cookie_secure: bool,
}

impl AppServices {
    pub fn session_ttl(&self) -> Duration {
        self.gate.session_ttl()
    }
}

/// Wire stores and services from configuration.
///
/// Sessions live in process memory in both modes.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServiceError> {
    let inventory: Arc<dyn InventoryStore>;
    let users: Arc<dyn UserDirectory>;
    match &config.storage {
        StorageConfig::InMemory => {
            tracing::warn!("USE_PERSISTENT_STORES is off; data lives in memory and is lost on exit");
            inventory = Arc::new(InMemoryInventoryStore::new());
            users = Arc::new(InMemoryUserDirectory::new());
        }
        StorageConfig::Postgres { database_url } => {
            let store = Arc::new(PostgresStore::connect(database_url).await?);
            tracing::info!("connected to postgres");
            inventory = store.clone();
            users = store;
        }
    }
    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let gate = SessionGate::new(users, sessions, config.session_ttl).with_hash_cost(config.bcrypt_cost);
    if let Some(user) = &config.bootstrap_user {
        gate.ensure_bootstrap_user(user).await?;
    }

    Ok(AppServices {
        catalog: PartCatalog::new(inventory.clone()),
        ledger: StockLedger::new(inventory.clone()),
        reports: ReportProjector::new(inventory),
        gate,
        cookie_secure: config.cookie_secure,
    })
}
