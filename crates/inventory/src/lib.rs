//! Spare-parts inventory domain.
//!
//! Business rules for the part catalog, the stock ledger and the quantity
//! reconciler, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod ledger;
pub mod part;
pub mod reconcile;
pub mod report;

pub use ledger::{
    DailyStockOutRow, NewStockIn, NewStockOut, StockInEntry, StockInRecord, StockOutEntry,
    StockOutRecord,
};
pub use part::{Category, NewPart, Part};
pub use report::{
    DailyStockOutSummary, DashboardSummary, StockLevel, StockStatusRow, StockStatusSummary,
};
