use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use sims_auth::UserAccount;
use sims_core::{DomainError, PartId, StockInId, StockOutId, UserId};
use sims_inventory::{
    reconcile, DailyStockOutRow, NewPart, NewStockIn, NewStockOut, Part, StockInEntry,
    StockInRecord, StockOutEntry, StockOutRecord, StockStatusRow,
};

use super::{InventoryStore, UserDirectory};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct InventoryState {
    parts: BTreeMap<PartId, Part>,
    stock_in: BTreeMap<StockInId, StockInEntry>,
    stock_out: BTreeMap<StockOutId, StockOutEntry>,
    last_part_id: i64,
    last_stock_in_id: i64,
    last_stock_out_id: i64,
}

impl InventoryState {
    fn part_name(&self, id: PartId) -> Option<&str> {
        self.parts.get(&id).map(|p| p.name.as_str())
    }
}

/// In-memory inventory store for tests/dev.
///
/// A single lock guards the whole state, so each method is atomic with
/// respect to every other.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<InventoryState>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, InventoryState>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Database("inventory lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InventoryState>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Database("inventory lock poisoned".to_string()))
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    rows.sort_by_key(|r| Reverse(key(r)));
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn insert_part(&self, part: NewPart, now: DateTime<Utc>) -> Result<Part, StoreError> {
        let mut state = self.write()?;
        state.last_part_id += 1;
        let part = part.into_part(PartId::new(state.last_part_id), now);
        state.parts.insert(part.id, part.clone());
        Ok(part)
    }

    async fn get_part(&self, id: PartId) -> Result<Option<Part>, StoreError> {
        Ok(self.read()?.parts.get(&id).cloned())
    }

    async fn list_parts(&self) -> Result<Vec<Part>, StoreError> {
        let mut parts: Vec<Part> = self.read()?.parts.values().cloned().collect();
        newest_first(&mut parts, |p| (p.created_at, p.id.get()));
        Ok(parts)
    }

    async fn record_stock_in(&self, entry: NewStockIn, now: DateTime<Utc>) -> Result<StockInEntry, StoreError> {
        let mut state = self.write()?;
        let part = state
            .parts
            .get_mut(&entry.part_id)
            .ok_or(DomainError::not_found("Spare part"))?;
        reconcile::apply_stock_in(part, entry.quantity)?;

        state.last_stock_in_id += 1;
        let entry = entry.into_entry(StockInId::new(state.last_stock_in_id), now);
        state.stock_in.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn list_stock_in(&self) -> Result<Vec<StockInRecord>, StoreError> {
        let state = self.read()?;
        let mut rows: Vec<StockInRecord> = state
            .stock_in
            .values()
            .filter_map(|e| {
                let part_name = state.part_name(e.part_id)?.to_string();
                Some(StockInRecord { entry: e.clone(), part_name })
            })
            .collect();
        newest_first(&mut rows, |r| (r.entry.created_at, r.entry.id.get()));
        Ok(rows)
    }

    async fn record_stock_out(&self, entry: NewStockOut, now: DateTime<Utc>) -> Result<StockOutEntry, StoreError> {
        let mut state = self.write()?;
        let part = state
            .parts
            .get_mut(&entry.part_id)
            .ok_or(DomainError::not_found("Spare part"))?;
        reconcile::apply_stock_out(part, entry.quantity)?;

        state.last_stock_out_id += 1;
        let entry = entry.into_entry(StockOutId::new(state.last_stock_out_id), now);
        state.stock_out.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update_stock_out(&self, id: StockOutId, change: NewStockOut) -> Result<StockOutEntry, StoreError> {
        let mut state = self.write()?;
        if !state.parts.contains_key(&change.part_id) {
            return Err(DomainError::not_found("Spare part").into());
        }
        let entry = state
            .stock_out
            .get_mut(&id)
            .ok_or(DomainError::not_found("Stock out record"))?;
        entry.rewrite(change);
        Ok(entry.clone())
    }

    async fn delete_stock_out(&self, id: StockOutId) -> Result<(), StoreError> {
        self.write()?
            .stock_out
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Stock out record").into())
    }

    async fn list_stock_out(&self) -> Result<Vec<StockOutRecord>, StoreError> {
        let state = self.read()?;
        let mut rows: Vec<StockOutRecord> = state
            .stock_out
            .values()
            .filter_map(|e| {
                let part_name = state.part_name(e.part_id)?.to_string();
                Some(StockOutRecord { entry: e.clone(), part_name })
            })
            .collect();
        newest_first(&mut rows, |r| (r.entry.created_at, r.entry.id.get()));
        Ok(rows)
    }

    async fn stock_out_on(&self, date: NaiveDate) -> Result<Vec<DailyStockOutRow>, StoreError> {
        let state = self.read()?;
        let mut rows: Vec<DailyStockOutRow> = state
            .stock_out
            .values()
            .filter(|e| e.date == date)
            .filter_map(|e| {
                let part = state.parts.get(&e.part_id)?;
                Some(DailyStockOutRow {
                    entry: e.clone(),
                    part_name: part.name.clone(),
                    category: part.category,
                })
            })
            .collect();
        newest_first(&mut rows, |r| (r.entry.created_at, r.entry.id.get()));
        Ok(rows)
    }

    async fn stock_status(&self) -> Result<Vec<StockStatusRow>, StoreError> {
        let state = self.read()?;
        let mut rows: Vec<StockStatusRow> = state
            .parts
            .values()
            .map(|p| StockStatusRow {
                part_id: p.id,
                part_name: p.name.clone(),
                category: p.category,
                unit_price: p.unit_price,
                quantity: p.quantity,
                total_stock_out: state
                    .stock_out
                    .values()
                    .filter(|e| e.part_id == p.id)
                    .map(|e| e.quantity)
                    .sum(),
            })
            .collect();
        rows.sort_by(|a, b| a.part_name.cmp(&b.part_name).then(a.part_id.cmp(&b.part_id)));
        Ok(rows)
    }
}

/// In-memory user accounts for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<Vec<UserAccount>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let users = self
            .inner
            .read()
            .map_err(|_| StoreError::Database("user lock poisoned".to_string()))?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<UserAccount, StoreError> {
        let mut users = self
            .inner
            .write()
            .map_err(|_| StoreError::Database("user lock poisoned".to_string()))?;
        if users.iter().any(|u| u.username == username) {
            return Err(DomainError::validation(format!("username {username:?} is taken")).into());
        }
        let account = UserAccount {
            id: UserId::new(users.len() as i64 + 1),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(account.clone());
        Ok(account)
    }
}
