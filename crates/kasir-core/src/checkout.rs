//! # Checkout Rules
//!
//! The per-line rules of a checkout, free of any storage concern.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kasir-db CheckoutEngine (inside one unit of work)                      │
//! │                                                                         │
//! │  for item in items:                                                     │
//! │      row  = locked read (StockRow)          ◄── storage                 │
//! │      tally.add_line(item, row)?             ◄── THIS MODULE             │
//! │      decrement stock                        ◄── storage                 │
//! │                                                                         │
//! │  insert header with tally.total()          ◄── storage                  │
//! │  insert tally.into_lines()                 ◄── storage                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure from [`CheckoutTally::add_line`] aborts the whole checkout. The
//! tally is discarded along with the rolled-back unit of work.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CheckoutItem;

// =============================================================================
// Locked Row
// =============================================================================

/// Product state as seen by the locked read of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockRow {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

// =============================================================================
// Pending Line
// =============================================================================

/// A priced checkout line waiting to be written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLine {
    pub product_id: i64,
    /// Name snapshot taken under the lock.
    pub product_name: String,
    pub quantity: i64,
    pub subtotal: Money,
}

/// Checks stock and prices a single line.
///
/// ## Errors
/// - [`CoreError::InsufficientStock`] when `row.stock < item.quantity`
/// - [`CoreError::AmountOverflow`] when `quantity × price` does not fit
pub fn price_line(item: &CheckoutItem, row: &StockRow) -> CoreResult<PendingLine> {
    if row.stock < item.quantity {
        return Err(CoreError::InsufficientStock {
            product_id: row.id,
            product_name: row.name.clone(),
            available: row.stock,
            requested: item.quantity,
        });
    }

    let subtotal = Money::new(row.price)
        .checked_mul_quantity(item.quantity)
        .ok_or(CoreError::AmountOverflow {
            context: "line subtotal",
        })?;

    Ok(PendingLine {
        product_id: row.id,
        product_name: row.name.clone(),
        quantity: item.quantity,
        subtotal,
    })
}

// =============================================================================
// Tally
// =============================================================================

/// Running total and pending lines of one checkout, in input order.
#[derive(Debug, Clone, Default)]
pub struct CheckoutTally {
    lines: Vec<PendingLine>,
    total: Money,
}

impl CheckoutTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prices `item` against its locked row and adds it to the running total.
    pub fn add_line(&mut self, item: &CheckoutItem, row: &StockRow) -> CoreResult<&PendingLine> {
        let line = price_line(item, row)?;

        self.total = self
            .total
            .checked_add(line.subtotal)
            .ok_or(CoreError::AmountOverflow {
                context: "checkout total",
            })?;

        self.lines.push(line);
        let last = self.lines.len() - 1;
        Ok(&self.lines[last])
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn lines(&self) -> &[PendingLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<PendingLine> {
        self.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
