//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌────────────────────┐   │
//! │  │    Product      │   │   Transaction    │   │ TransactionDetail  │   │
//! │  │  ─────────────  │   │  ──────────────  │   │ ────────────────── │   │
//! │  │  id             │   │  id              │   │ transaction_id (FK)│   │
//! │  │  name           │   │  total_amount    │◄──│ product_id         │   │
//! │  │  price          │   │  created_at      │   │ product_name (snap)│   │
//! │  │  stock (≥ 0)    │   │  details[]       │   │ quantity, subtotal │   │
//! │  └─────────────────┘   └──────────────────┘   └────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐                            │
//! │  │  CheckoutItem   │   │   SalesSummary   │  (derived, never stored)   │
//! │  │  product_id     │   │  total_revenue   │                            │
//! │  │  quantity (> 0) │   │  best seller     │                            │
//! │  └─────────────────┘   └──────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger (`Transaction` + `TransactionDetail`) is append-only: nothing in
//! the workspace updates or deletes a committed row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier.
    #[ts(type = "number")]
    pub id: i64,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Unit price in the smallest currency unit.
    #[ts(type = "number")]
    pub price: i64,

    /// Units on hand. Never negative.
    #[ts(type = "number")]
    pub stock: i64,
}

/// Fields supplied by a client when creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[ts(type = "number")]
    pub price: i64,
    #[ts(type = "number")]
    pub stock: i64,
}

// =============================================================================
// Checkout Input
// =============================================================================

/// One requested line of a checkout. Not persisted directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    #[ts(type = "number")]
    pub product_id: i64,
    #[ts(type = "number")]
    pub quantity: i64,
}

/// Body of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

// =============================================================================
// Ledger
// =============================================================================

/// A committed sale. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    #[ts(type = "number")]
    pub id: i64,

    /// Sum of the details' subtotals.
    #[ts(type = "number")]
    pub total_amount: i64,

    /// Commit timestamp assigned by the server.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Lines in checkout input order.
    pub details: Vec<TransactionDetail>,
}

/// A line item of a transaction.
/// Uses the snapshot pattern: `product_name` is frozen at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionDetail {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub transaction_id: i64,
    #[ts(type = "number")]
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    #[ts(type = "number")]
    pub quantity: i64,
    /// `quantity × price` at time of sale.
    #[ts(type = "number")]
    pub subtotal: i64,
}

// =============================================================================
// Reporting
// =============================================================================

/// Aggregate over committed transactions in a date range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    #[ts(type = "number")]
    pub total_revenue: i64,
    #[ts(type = "number")]
    pub total_transactions: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub best_selling_product: Option<BestSellingProduct>,
}

/// The product with the highest quantity sold in a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BestSellingProduct {
    pub name: String,
    #[ts(type = "number")]
    pub quantity: i64,
}

/// Inclusive range of calendar dates (UTC) for reports.
///
/// Only built through [`DateRange::new`] or [`DateRange::day`], so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `start` must not be after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidFormat {
                field: "start_date".to_string(),
                reason: format!("{} is after end_date {}", start, end),
            });
        }
        Ok(DateRange { start, end })
    }

    /// A single-day range.
    pub fn day(date: NaiveDate) -> Self {
        DateRange {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// The day after `end`, as an exclusive upper bound.
    ///
    /// Saturates at `NaiveDate::MAX`.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(NaiveDate::MAX)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
