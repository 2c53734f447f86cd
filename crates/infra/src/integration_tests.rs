//! Integration tests for the full service stack over the in-memory stores.
//!
//! Tests: PartCatalog → StockLedger → InventoryStore → ReportProjector
//!
//! Verifies:
//! - Quantity follows stock-in and stock-out entries
//! - Rejected stock-outs leave no trace
//! - Editing or deleting a stock-out does not move the quantity
//! - Concurrent stock-outs cannot oversell

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use sims_core::DomainError;
    use sims_inventory::{Category, NewPart, NewStockIn, NewStockOut, StockLevel};

    use crate::error::ServiceError;
    use crate::store::{InMemoryInventoryStore, InventoryStore};
    use crate::{PartCatalog, ReportProjector, StockLedger};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn setup() -> (PartCatalog, StockLedger, ReportProjector, Arc<InMemoryInventoryStore>) {
        sims_observability::tracing::init_for_tests();
        let store = Arc::new(InMemoryInventoryStore::new());
        (
            PartCatalog::new(store.clone()),
            StockLedger::new(store.clone()),
            ReportProjector::new(store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn brake_pad_lifecycle() {
        let (catalog, ledger, reports, store) = setup();

        let part = catalog
            .add_part(NewPart { name: "Brake Pad".into(), category: Category::Brakes, quantity: 20, unit_price: 5.0 })
            .await
            .unwrap();
        assert_eq!(part.quantity, 20);
        assert_eq!(part.total_price, 100.0);

        ledger
            .record_stock_in(NewStockIn { part_id: part.id, quantity: 5, date: day("2024-01-01") })
            .await
            .unwrap();
        assert_eq!(store.get_part(part.id).await.unwrap().unwrap().quantity, 25);

        let err = ledger
            .record_stock_out(NewStockOut { part_id: part.id, quantity: 30, unit_price: 6.0, date: day("2024-01-02") })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InsufficientStock { requested: 30, available: 25 })
        ));
        assert_eq!(store.get_part(part.id).await.unwrap().unwrap().quantity, 25);
        assert!(ledger.list_stock_out().await.unwrap().is_empty());

        let out = ledger
            .record_stock_out(NewStockOut { part_id: part.id, quantity: 25, unit_price: 6.0, date: day("2024-01-02") })
            .await
            .unwrap();
        assert_eq!(out.total_price, 150.0);
        assert_eq!(store.get_part(part.id).await.unwrap().unwrap().quantity, 0);

        let daily = reports.daily_stock_out(day("2024-01-02")).await.unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].part_name, "Brake Pad");
        assert_eq!(daily[0].category, Category::Brakes);
        assert_eq!(daily.iter().map(|r| r.entry.total_price).sum::<f64>(), 150.0);

        let status = reports.stock_status().await.unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].total_stock_out, 25);
        assert_eq!(status[0].level(), StockLevel::Critical);

        let listed = ledger.list_stock_in().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].part_name, "Brake Pad");
    }

    #[tokio::test]
    async fn editing_and_deleting_stock_out_leave_quantity_alone() {
        let (catalog, ledger, _reports, store) = setup();
        let part = catalog
            .add_part(NewPart { name: "Spark Plug".into(), category: Category::Engine, quantity: 10, unit_price: 2.0 })
            .await
            .unwrap();

        let out = ledger
            .record_stock_out(NewStockOut { part_id: part.id, quantity: 4, unit_price: 2.0, date: day("2024-01-05") })
            .await
            .unwrap();
        assert_eq!(store.get_part(part.id).await.unwrap().unwrap().quantity, 6);

        // Raising the quantity past what is on hand is accepted: edits are not re-checked.
        let edited = ledger
            .update_stock_out(out.id, NewStockOut { part_id: part.id, quantity: 9, unit_price: 3.0, date: day("2024-01-06") })
            .await
            .unwrap();
        assert_eq!(edited.total_price, 27.0);
        assert_eq!(edited.created_at, out.created_at);
        assert_eq!(store.get_part(part.id).await.unwrap().unwrap().quantity, 6);

        ledger.delete_stock_out(out.id).await.unwrap();
        assert!(ledger.list_stock_out().await.unwrap().is_empty());
        assert_eq!(store.get_part(part.id).await.unwrap().unwrap().quantity, 6);
    }

    #[tokio::test]
    async fn overflowing_stock_in_is_rejected_and_store_stays_usable() {
        let (catalog, ledger, _reports, store) = setup();
        let part = catalog
            .add_part(NewPart { name: "Wiper Blade".into(), category: Category::Other, quantity: 1, unit_price: 4.0 })
            .await
            .unwrap();

        let err = ledger
            .record_stock_in(NewStockIn { part_id: part.id, quantity: i64::MAX, date: day("2024-01-01") })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert!(ledger.list_stock_in().await.unwrap().is_empty());

        let parts = catalog.list_parts().await.unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(store.get_part(part.id).await.unwrap().unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn concurrent_stock_outs_cannot_drive_quantity_negative() {
        let (catalog, ledger, _reports, store) = setup();
        let part_id = catalog
            .add_part(NewPart { name: "Oil Filter".into(), category: Category::Engine, quantity: 5, unit_price: 8.0 })
            .await
            .unwrap()
            .id;

        let attempts: Vec<_> = (0..10)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move {
                    ledger
                        .record_stock_out(NewStockOut { part_id, quantity: 1, unit_price: 8.0, date: day("2024-01-02") })
                        .await
                })
            })
            .collect();

        let mut accepted = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(ServiceError::Domain(DomainError::InsufficientStock { .. })) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(accepted, 5);
        assert_eq!(store.get_part(part_id).await.unwrap().unwrap().quantity, 0);
        assert_eq!(ledger.list_stock_out().await.unwrap().len(), 5);
    }
}
