//! Storage boundary for the catalog, the stock ledger and user accounts.
//!
//! Every method is a self-contained unit of work. In particular the ledger
//! writes that move a part's quantity (`record_stock_in`,
//! `record_stock_out`) apply the quantity change and the entry insert
//! together: both happen or neither does, and the stock-out sufficiency
//! check is part of the same guarded write, so concurrent stock-outs cannot
//! drive a quantity negative.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use sims_auth::UserAccount;
use sims_core::{PartId, StockOutId};
use sims_inventory::{
    DailyStockOutRow, NewPart, NewStockIn, NewStockOut, Part, StockInEntry, StockInRecord,
    StockOutEntry, StockOutRecord, StockStatusRow,
};

use crate::error::StoreError;

pub use in_memory::{InMemoryInventoryStore, InMemoryUserDirectory};
pub use postgres::PostgresStore;

/// Persistent state of the part catalog and the stock ledger.
///
/// Listings are newest first (by `created_at`, ties broken by id
/// descending) unless stated otherwise.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Insert a validated part; `total_price` is fixed here.
    async fn insert_part(&self, part: NewPart, now: DateTime<Utc>) -> Result<Part, StoreError>;

    async fn get_part(&self, id: PartId) -> Result<Option<Part>, StoreError>;

    async fn list_parts(&self) -> Result<Vec<Part>, StoreError>;

    /// Insert a stock-in entry and credit the part's quantity.
    ///
    /// Fails with `DomainError::NotFound` if the part does not exist.
    async fn record_stock_in(&self, entry: NewStockIn, now: DateTime<Utc>) -> Result<StockInEntry, StoreError>;

    async fn list_stock_in(&self) -> Result<Vec<StockInRecord>, StoreError>;

    /// Debit the part's quantity if `quantity <= on hand`, then insert the entry.
    ///
    /// Fails with `DomainError::InsufficientStock` (no writes) when the guard
    /// fails, or `DomainError::NotFound` if the part does not exist.
    async fn record_stock_out(&self, entry: NewStockOut, now: DateTime<Utc>) -> Result<StockOutEntry, StoreError>;

    /// Overwrite every field of an entry. Part quantities are not touched.
    async fn update_stock_out(&self, id: StockOutId, change: NewStockOut) -> Result<StockOutEntry, StoreError>;

    /// Delete an entry. Part quantities are not touched.
    async fn delete_stock_out(&self, id: StockOutId) -> Result<(), StoreError>;

    async fn list_stock_out(&self) -> Result<Vec<StockOutRecord>, StoreError>;

    /// Stock-out entries dated `date`, joined with part name and category.
    async fn stock_out_on(&self, date: NaiveDate) -> Result<Vec<DailyStockOutRow>, StoreError>;

    /// One row per part with its total stock-out to date, ordered by part name.
    async fn stock_status(&self) -> Result<Vec<StockStatusRow>, StoreError>;
}

/// Lookup and creation of user accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Create an account. Usernames are unique; a duplicate is a validation error.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<UserAccount, StoreError>;
}
