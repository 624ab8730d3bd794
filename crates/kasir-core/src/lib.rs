//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate holds the rules of a sale as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                          │   │
//! │  │    /api/product, /api/checkout, /api/report                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │PendingLine│  │   rules   │  │   │
//! │  │   │Transaction│  │ checked × │  │  Tally    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │      SQLite, unit of work, checkout engine, reporting           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, SalesSummary, etc.)
//! - [`money`] - Integer money with overflow-checked arithmetic
//! - [`checkout`] - Per-line stock check and subtotal rules
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::checkout::{CheckoutTally, StockRow};
//! use kasir_core::CheckoutItem;
//!
//! let row = StockRow { id: 1, name: "Indomie".into(), price: 3000, stock: 50 };
//! let item = CheckoutItem { product_id: 1, quantity: 2 };
//!
//! let mut tally = CheckoutTally::new();
//! tally.add_line(&item, &row).unwrap();
//!
//! assert_eq!(tally.total().amount(), 6000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines accepted in a single checkout request.
///
/// ## Business Reason
/// Every line holds the inventory lock a little longer. Bounding the request
/// bounds how long one checkout can block competing checkouts.
pub const MAX_CHECKOUT_ITEMS: usize = 100;

/// Maximum length of a product name, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
