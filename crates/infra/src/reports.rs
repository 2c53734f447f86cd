//! Read-only projections over the catalog and the stock ledger.

use std::sync::Arc;

use chrono::NaiveDate;

use sims_inventory::{
    DailyStockOutRow, DailyStockOutSummary, DashboardSummary, StockLevel, StockStatusRow,
    StockStatusSummary,
};

use crate::error::ServiceError;
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct ReportProjector {
    store: Arc<dyn InventoryStore>,
}

impl ReportProjector {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Stock-out entries dated `date` (calendar day), newest first.
    pub async fn daily_stock_out(&self, date: NaiveDate) -> Result<Vec<DailyStockOutRow>, ServiceError> {
        Ok(self.store.stock_out_on(date).await?)
    }

    pub async fn daily_summary(&self, date: NaiveDate) -> Result<DailyStockOutSummary, ServiceError> {
        let rows = self.daily_stock_out(date).await?;
        Ok(DailyStockOutSummary::from_rows(date, &rows))
    }

    /// Every part with its stock-out total to date, ordered by part name.
    pub async fn stock_status(&self) -> Result<Vec<StockStatusRow>, ServiceError> {
        Ok(self.store.stock_status().await?)
    }

    pub async fn stock_status_summary(&self) -> Result<StockStatusSummary, ServiceError> {
        let rows = self.stock_status().await?;
        Ok(StockStatusSummary::from_rows(&rows))
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        let parts = self.store.list_parts().await?;
        let stock_in = self.store.list_stock_in().await?;
        let stock_out = self.store.list_stock_out().await?;

        Ok(DashboardSummary {
            total_spare_parts: parts.len(),
            total_stock_in: stock_in.len(),
            total_stock_out: stock_out.len(),
            low_stock_items: parts
                .iter()
                .filter(|p| StockLevel::classify(p.quantity) != StockLevel::Good)
                .count(),
        })
    }
}
