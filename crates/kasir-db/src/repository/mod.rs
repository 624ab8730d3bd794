//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │  db.products().list(Some("indomie"))                           │
//! │       ▼                                                                 │
//! │  ProductRepository      ─┐                                             │
//! │  TransactionRepository   ├── pool-backed, one statement per call       │
//! │  ReportRepository       ─┘                                             │
//! │                                                                         │
//! │  product::lock_for_checkout      ─┐                                    │
//! │  product::decrement_stock         ├── take &mut UnitOfWork, used only  │
//! │  transaction::insert_transaction  │   by the checkout engine           │
//! │  transaction::insert_detail      ─┘                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD
//! - [`TransactionRepository`](transaction::TransactionRepository) - Ledger reads
//! - [`ReportRepository`](report::ReportRepository) - Sales summaries

pub mod product;
pub mod report;
pub mod transaction;
