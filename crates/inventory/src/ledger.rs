//! Stock ledger entries (stock-in and stock-out logs).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use sims_core::{DomainError, DomainResult, Entity, PartId, StockInId, StockOutId};

use crate::part::Category;

/// Request to record goods received for a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockIn {
    pub part_id: PartId,
    pub quantity: i64,
    pub date: NaiveDate,
}

impl NewStockIn {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::validation("Stock in quantity must be positive"));
        }
        Ok(())
    }

    pub fn into_entry(self, id: StockInId, created_at: DateTime<Utc>) -> StockInEntry {
        StockInEntry {
            id,
            part_id: self.part_id,
            quantity: self.quantity,
            date: self.date,
            created_at,
        }
    }
}

/// Immutable stock-in log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInEntry {
    pub id: StockInId,
    pub part_id: PartId,
    pub quantity: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Entity for StockInEntry {
    type Id = StockInId;

    fn id(&self) -> StockInId {
        self.id
    }
}

/// Request to record goods issued for a part.
///
/// Used both for creating an entry and for rewriting an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockOut {
    pub part_id: PartId,
    pub quantity: i64,
    pub unit_price: f64,
    pub date: NaiveDate,
}

impl NewStockOut {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::validation("Stock out quantity must be positive"));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(DomainError::validation(
                "Stock out unit price must be a non-negative number",
            ));
        }
        if !self.total_price().is_finite() {
            return Err(DomainError::validation("Stock out total price is too large"));
        }
        Ok(())
    }

    pub fn total_price(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    pub fn into_entry(self, id: StockOutId, created_at: DateTime<Utc>) -> StockOutEntry {
        let total_price = self.total_price();
        StockOutEntry {
            id,
            part_id: self.part_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price,
            date: self.date,
            created_at,
        }
    }
}

/// Stock-out log entry, priced at the time of removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOutEntry {
    pub id: StockOutId,
    pub part_id: PartId,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl StockOutEntry {
    /// Overwrite every field from `change`, recomputing the total price.
    ///
    /// Identity and `created_at` are kept.
    pub fn rewrite(&mut self, change: NewStockOut) {
        self.total_price = change.total_price();
        self.part_id = change.part_id;
        self.quantity = change.quantity;
        self.unit_price = change.unit_price;
        self.date = change.date;
    }
}

impl Entity for StockOutEntry {
    type Id = StockOutId;

    fn id(&self) -> StockOutId {
        self.id
    }
}

/// Stock-in entry joined with the referenced part's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInRecord {
    pub entry: StockInEntry,
    pub part_name: String,
}

/// Stock-out entry joined with the referenced part's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOutRecord {
    pub entry: StockOutEntry,
    pub part_name: String,
}

/// Stock-out entry joined with part name and category (daily report row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStockOutRow {
    pub entry: StockOutEntry,
    pub part_name: String,
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn stock_out_total_is_quantity_times_price() {
        let entry = NewStockOut {
            part_id: PartId::new(1),
            quantity: 25,
            unit_price: 6.0,
            date: day("2024-01-02"),
        }
        .into_entry(StockOutId::new(1), Utc::now());
        assert_eq!(entry.total_price, 150.0);
    }

    #[test]
    fn zero_or_negative_quantities_are_rejected() {
        let stock_in = NewStockIn { part_id: PartId::new(1), quantity: 0, date: day("2024-01-01") };
        assert!(stock_in.validate().is_err());

        let stock_out = NewStockOut {
            part_id: PartId::new(1),
            quantity: -2,
            unit_price: 1.0,
            date: day("2024-01-01"),
        };
        assert!(stock_out.validate().is_err());
    }

    #[test]
    fn overflowing_stock_out_total_is_rejected() {
        let stock_out = NewStockOut {
            part_id: PartId::new(1),
            quantity: i64::MAX,
            unit_price: f64::MAX,
            date: day("2024-01-01"),
        };
        assert!(matches!(stock_out.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn rewrite_recomputes_total_and_keeps_identity() {
        let created = Utc::now();
        let mut entry = NewStockOut {
            part_id: PartId::new(1),
            quantity: 2,
            unit_price: 3.0,
            date: day("2024-01-02"),
        }
        .into_entry(StockOutId::new(9), created);

        entry.rewrite(NewStockOut {
            part_id: PartId::new(4),
            quantity: 5,
            unit_price: 1.5,
            date: day("2024-02-01"),
        });

        assert_eq!(entry.id, StockOutId::new(9));
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.part_id, PartId::new(4));
        assert_eq!(entry.total_price, 7.5);
        assert_eq!(entry.date, day("2024-02-01"));
    }
}
