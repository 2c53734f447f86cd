//! Quantity reconciler: keeps `Part::quantity` in step with ledger writes.
//!
//! `Part::quantity` is a running counter mutated by these rules, not a value
//! derived from the ledger. Only creates move it: editing or deleting a
//! stock-out entry leaves the counter untouched, so the counter can drift
//! from `sum(stock in) - sum(stock out)` after such edits.
//!
//! Storage implementations must apply a rule and write the matching ledger
//! entry atomically (one lock scope or one transaction).

use sims_core::{DomainError, DomainResult};

use crate::part::Part;

/// Check that `requested` can be taken from `available`.
fn ensure_sufficient(available: i64, requested: i64) -> DomainResult<()> {
    if requested > available {
        return Err(DomainError::insufficient_stock(requested, available));
    }
    Ok(())
}

/// Credit a stock-in to the part's on-hand quantity.
pub fn apply_stock_in(part: &mut Part, quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("Stock in quantity must be positive"));
    }
    part.quantity = part
        .quantity
        .checked_add(quantity)
        .ok_or_else(|| DomainError::validation("Stock in quantity is too large"))?;
    Ok(())
}

/// Debit a stock-out from the part's on-hand quantity.
///
/// Fails without touching the part when stock is insufficient.
pub fn apply_stock_out(part: &mut Part, quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("Stock out quantity must be positive"));
    }
    ensure_sufficient(part.quantity, quantity)?;
    part.quantity -= quantity;
    Ok(())
}
