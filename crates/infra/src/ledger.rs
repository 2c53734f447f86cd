//! Stock ledger service: stock-in and stock-out entries.
//!
//! Quantity reconciliation happens inside the store so the guard, the
//! counter update and the entry insert are one atomic unit. Editing or
//! deleting a stock-out entry never touches the part's quantity.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use sims_core::{DomainError, StockOutId};
use sims_inventory::{NewStockIn, NewStockOut, StockInEntry, StockInRecord, StockOutEntry, StockOutRecord};

use crate::error::ServiceError;
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct StockLedger {
    store: Arc<dyn InventoryStore>,
}

impl StockLedger {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, entry), fields(part_id = %entry.part_id, quantity = entry.quantity), err)]
    pub async fn record_stock_in(&self, entry: NewStockIn) -> Result<StockInEntry, ServiceError> {
        entry.validate()?;
        let entry = self.store.record_stock_in(entry, Utc::now()).await?;
        info!(stock_in_id = %entry.id, "stock in recorded");
        Ok(entry)
    }

    pub async fn list_stock_in(&self) -> Result<Vec<StockInRecord>, ServiceError> {
        Ok(self.store.list_stock_in().await?)
    }

    /// Record a stock-out, rejecting it when the part has fewer units on hand.
    #[instrument(skip(self, entry), fields(part_id = %entry.part_id, quantity = entry.quantity), err)]
    pub async fn record_stock_out(&self, entry: NewStockOut) -> Result<StockOutEntry, ServiceError> {
        entry.validate()?;
        match self.store.record_stock_out(entry, Utc::now()).await {
            Ok(entry) => {
                info!(stock_out_id = %entry.id, total_price = entry.total_price, "stock out recorded");
                Ok(entry)
            }
            Err(e) => {
                let e = ServiceError::from(e);
                if let ServiceError::Domain(DomainError::InsufficientStock { requested, available }) = &e {
                    warn!(requested, available, "stock out rejected");
                }
                Err(e)
            }
        }
    }

    /// Overwrite a stock-out entry. The referenced part must exist.
    #[instrument(skip(self, change), fields(stock_out_id = %id), err)]
    pub async fn update_stock_out(&self, id: StockOutId, change: NewStockOut) -> Result<StockOutEntry, ServiceError> {
        change.validate()?;
        let entry = self.store.update_stock_out(id, change).await?;
        info!("stock out updated");
        Ok(entry)
    }

    #[instrument(skip(self), fields(stock_out_id = %id), err)]
    pub async fn delete_stock_out(&self, id: StockOutId) -> Result<(), ServiceError> {
        self.store.delete_stock_out(id).await?;
        info!("stock out deleted");
        Ok(())
    }

    pub async fn list_stock_out(&self) -> Result<Vec<StockOutRecord>, ServiceError> {
        Ok(self.store.list_stock_out().await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sims_core::PartId;
    use sims_inventory::{Category, NewPart};

    use super::*;
    use crate::store::InMemoryInventoryStore;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn ledger_with_part(quantity: i64) -> (StockLedger, Arc<InMemoryInventoryStore>, PartId) {
        let store = Arc::new(InMemoryInventoryStore::new());
        let part = store
            .insert_part(
                NewPart { name: "Clutch Plate".into(), category: Category::Transmission, quantity, unit_price: 40.0 },
                Utc::now(),
            )
            .await
            .unwrap();
        (StockLedger::new(store.clone()), store, part.id)
    }

    #[tokio::test]
    async fn non_positive_quantities_never_reach_the_store() {
        let (ledger, store, part_id) = ledger_with_part(5).await;
        let err = ledger
            .record_stock_in(NewStockIn { part_id, quantity: 0, date: day("2024-01-01") })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert!(store.list_stock_in().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_requires_existing_part_and_entry() {
        let (ledger, _store, part_id) = ledger_with_part(5).await;
        let entry = ledger
            .record_stock_out(NewStockOut { part_id, quantity: 2, unit_price: 40.0, date: day("2024-01-02") })
            .await
            .unwrap();

        let to_missing_part = NewStockOut { part_id: PartId::new(404), quantity: 1, unit_price: 1.0, date: day("2024-01-02") };
        let err = ledger.update_stock_out(entry.id, to_missing_part).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound("Spare part"))));

        let change = NewStockOut { part_id, quantity: 1, unit_price: 1.0, date: day("2024-01-02") };
        let err = ledger.update_stock_out(StockOutId::new(404), change).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound("Stock out record"))));
    }

    #[tokio::test]
    async fn delete_of_unknown_entry_is_not_found() {
        let (ledger, _store, _) = ledger_with_part(5).await;
        let err = ledger.delete_stock_out(StockOutId::new(7)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound(_))));
    }
}
