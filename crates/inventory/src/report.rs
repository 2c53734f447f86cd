//! Report rows derived from the catalog and the stock ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sims_core::PartId;

use crate::ledger::DailyStockOutRow;
use crate::part::Category;

/// Stock level classification used by the stock status report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockLevel {
    /// quantity < 5
    Critical,
    /// 5 <= quantity < 10
    Low,
    /// quantity >= 10
    Good,
}

impl StockLevel {
    pub const CRITICAL_BELOW: i64 = 5;
    pub const LOW_BELOW: i64 = 10;

    pub fn classify(quantity: i64) -> Self {
        if quantity < Self::CRITICAL_BELOW {
            StockLevel::Critical
        } else if quantity < Self::LOW_BELOW {
            StockLevel::Low
        } else {
            StockLevel::Good
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockLevel::Critical => "Critical",
            StockLevel::Low => "Low",
            StockLevel::Good => "Good",
        }
    }
}

/// One part in the stock status report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockStatusRow {
    pub part_id: PartId,
    pub part_name: String,
    pub category: Category,
    pub unit_price: f64,
    /// Current on-hand quantity (the running counter).
    pub quantity: i64,
    /// Sum of every stock-out quantity referencing the part.
    pub total_stock_out: i64,
}

impl StockStatusRow {
    pub fn level(&self) -> StockLevel {
        StockLevel::classify(self.quantity)
    }
}

/// Counts per stock level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatusSummary {
    pub good: usize,
    pub low: usize,
    pub critical: usize,
}

impl StockStatusSummary {
    pub fn from_rows(rows: &[StockStatusRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            match row.level() {
                StockLevel::Good => acc.good += 1,
                StockLevel::Low => acc.low += 1,
                StockLevel::Critical => acc.critical += 1,
            }
            acc
        })
    }
}

/// Totals for one day of stock-out activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyStockOutSummary {
    pub date: NaiveDate,
    pub count: usize,
    pub total: f64,
}

impl DailyStockOutSummary {
    pub fn from_rows(date: NaiveDate, rows: &[DailyStockOutRow]) -> Self {
        Self {
            date,
            count: rows.len(),
            total: rows.iter().map(|r| r.entry.total_price).sum(),
        }
    }
}

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_spare_parts: usize,
    pub total_stock_in: usize,
    pub total_stock_out: usize,
    /// Parts below the "Good" threshold.
    pub low_stock_items: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(quantity: i64) -> StockStatusRow {
        StockStatusRow {
            part_id: PartId::new(1),
            part_name: "Brake Pad".to_string(),
            category: Category::Brakes,
            unit_price: 5.0,
            quantity,
            total_stock_out: 0,
        }
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(StockLevel::classify(0), StockLevel::Critical);
        assert_eq!(StockLevel::classify(4), StockLevel::Critical);
        assert_eq!(StockLevel::classify(5), StockLevel::Low);
        assert_eq!(StockLevel::classify(9), StockLevel::Low);
        assert_eq!(StockLevel::classify(10), StockLevel::Good);
    }

    #[test]
    fn summary_counts_each_level() {
        let rows = [row(0), row(3), row(7), row(10), row(50)];
        let summary = StockStatusSummary::from_rows(&rows);
        assert_eq!(summary, StockStatusSummary { good: 2, low: 1, critical: 2 });
    }
}
