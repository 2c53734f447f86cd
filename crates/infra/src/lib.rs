//! Infrastructure layer: storage backends, configuration, and the services
//! that orchestrate catalog, ledger, report and session operations.

pub mod catalog;
pub mod config;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod reports;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use catalog::PartCatalog;
pub use config::{AppConfig, BootstrapUser, ConfigError, StorageConfig};
pub use error::{ServiceError, StoreError};
pub use gate::SessionGate;
pub use ledger::StockLedger;
pub use reports::ReportProjector;
pub use store::{InMemoryInventoryStore, InMemoryUserDirectory, InventoryStore, PostgresStore, UserDirectory};
