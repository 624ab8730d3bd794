//! # Checkout Engine
//!
//! Turns a cart into a committed ledger entry, atomically.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout(items)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_checkout_items ──✗──► Rejected(Validation), nothing opened    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────┐       │
//! │  for item in items (input order):                               │       │
//! │      lock_for_checkout ──None──► Rejected(ProductNotFound)      │       │
//! │      tally.add_line   ──✗────► Rejected(InsufficientStock)      │ any ✗ │
//! │      decrement_stock                                            │   ▼   │
//! │  insert_transaction(tally.total) → id, created_at               │ROLLBACK
//! │  insert_detail × N                                              │       │
//! │  COMMIT ────────────────────────────────────────────────────────┘       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Transaction { id, total_amount, created_at, details }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The first locked read takes SQLite's write lock, so overlapping checkouts
//! run one after another and each sees the stock the previous one left.
//! Waiting is bounded by the pool's busy timeout; past it the checkout fails
//! with [`CheckoutError::Busy`]. There is no retry here: a caller that
//! retries must expect the stock to have changed.

use kasir_core::checkout::CheckoutTally;
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutItem, CoreError, Transaction};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, CheckoutResult};
use crate::repository::{product, transaction};
use crate::unit_of_work::UnitOfWork;

/// Atomic checkout over the product table and the ledger.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Checks out `items` as one unit of work.
    ///
    /// Duplicate product ids are separate lines; the second one sees the
    /// stock already decremented by the first.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - Committed, with details in input order
    /// * `Err(CheckoutError)` - Nothing was written
    pub async fn checkout(&self, items: &[CheckoutItem]) -> CheckoutResult<Transaction> {
        validate_checkout_items(items)?;

        debug!(lines = items.len(), "Starting checkout");

        let mut uow = UnitOfWork::begin(&self.pool).await?;

        match Self::apply(&mut uow, items).await {
            Ok(transaction) => {
                uow.commit().await?;
                info!(
                    transaction_id = transaction.id,
                    total_amount = transaction.total_amount,
                    lines = transaction.details.len(),
                    "Checkout committed"
                );
                Ok(transaction)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed checkout failed");
                }
                warn!(kind = err.kind(), error = %err, "Checkout rejected");
                Err(err)
            }
        }
    }

    /// Every statement of a checkout, run inside `uow`.
    async fn apply(uow: &mut UnitOfWork, items: &[CheckoutItem]) -> CheckoutResult<Transaction> {
        let mut tally = CheckoutTally::new();

        for item in items {
            let row = product::lock_for_checkout(uow, item.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(item.product_id))?;

            tally.add_line(item, &row)?;

            // The row is locked, so this only fails if the lock was lost.
            if !product::decrement_stock(uow, row.id, item.quantity).await? {
                return Err(CoreError::InsufficientStock {
                    product_id: row.id,
                    product_name: row.name,
                    available: row.stock,
                    requested: item.quantity,
                }
                .into());
            }
        }

        let total_amount = tally.total().amount();
        let (id, created_at) = transaction::insert_transaction(uow, total_amount).await?;

        let lines = tally.into_lines();
        let mut details = Vec::with_capacity(lines.len());
        for line in &lines {
            details.push(transaction::insert_detail(uow, id, line).await?);
        }

        Ok(Transaction {
            id,
            total_amount,
            created_at,
            details,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kasir_core::{NewProduct, Product, ValidationError};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_product(db: &Database, name: &str, price: i64, stock: i64) -> Product {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                price,
                stock,
            })
            .await
            .unwrap()
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    async fn assert_ledger_empty(db: &Database) {
        assert_eq!(db.transactions().count().await.unwrap(), 0);
        assert_eq!(db.transactions().count_details().await.unwrap(), 0);
    }

    fn item(product_id: i64, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_single_line_checkout() {
        let db = setup().await;
        let p = add_product(&db, "Indomie", 3000, 50).await;

        let tx = db.checkout().checkout(&[item(p.id, 2)]).await.unwrap();

        assert_eq!(tx.total_amount, 6000);
        assert_eq!(tx.details.len(), 1);
        let detail = &tx.details[0];
        assert_eq!(detail.product_id, p.id);
        assert_eq!(detail.product_name, "Indomie");
        assert_eq!(detail.quantity, 2);
        assert_eq!(detail.subtotal, 6000);
        assert_eq!(detail.transaction_id, tx.id);

        assert_eq!(stock_of(&db, p.id).await, 48);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let db = setup().await;
        let p = add_product(&db, "Indomie", 3000, 50).await;

        let err = db.checkout().checkout(&[item(p.id, 100)]).await.unwrap_err();

        match err {
            CheckoutError::Rejected(CoreError::InsufficientStock {
                product_id,
                available,
                requested,
                ..
            }) => {
                assert_eq!(product_id, p.id);
                assert_eq!(available, 50);
                assert_eq!(requested, 100);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&db, p.id).await, 50);
        assert_ledger_empty(&db).await;
    }

    #[tokio::test]
    async fn test_unknown_product_changes_nothing() {
        let db = setup().await;

        let err = db.checkout().checkout(&[item(999, 1)]).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::ProductNotFound(999))
        ));
        assert_eq!(err.kind(), "product_not_found");
        assert_ledger_empty(&db).await;
    }

    #[tokio::test]
    async fn test_multi_line_checkout_keeps_input_order() {
        let db = setup().await;
        let a = add_product(&db, "A", 1000, 5).await;
        let b = add_product(&db, "B", 2000, 5).await;

        let tx = db
            .checkout()
            .checkout(&[item(a.id, 2), item(b.id, 1)])
            .await
            .unwrap();

        assert_eq!(tx.total_amount, 4000);
        let subtotal_sum: i64 = tx.details.iter().map(|d| d.subtotal).sum();
        assert_eq!(subtotal_sum, tx.total_amount);
        let ids: Vec<i64> = tx.details.iter().map(|d| d.product_id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        assert_eq!(stock_of(&db, a.id).await, 3);
        assert_eq!(stock_of(&db, b.id).await, 4);
    }

    #[tokio::test]
    async fn test_failure_on_later_line_rolls_back_earlier_lines() {
        let db = setup().await;
        let a = add_product(&db, "A", 1000, 5).await;
        let b = add_product(&db, "B", 2000, 1).await;

        let err = db
            .checkout()
            .checkout(&[item(a.id, 2), item(b.id, 3)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "insufficient_stock");

        let err = db
            .checkout()
            .checkout(&[item(a.id, 2), item(999, 1)])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "product_not_found");

        assert_eq!(stock_of(&db, a.id).await, 5);
        assert_eq!(stock_of(&db, b.id).await, 1);
        assert_ledger_empty(&db).await;
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_independent() {
        let db = setup().await;
        let p = add_product(&db, "Indomie", 3000, 5).await;

        let tx = db
            .checkout()
            .checkout(&[item(p.id, 2), item(p.id, 3)])
            .await
            .unwrap();
        assert_eq!(tx.details.len(), 2);
        assert_eq!(tx.total_amount, 15000);
        assert_eq!(stock_of(&db, p.id).await, 0);

        // Second line sees the first line's decrement.
        let p = add_product(&db, "Teh Botol", 5000, 5).await;
        let err = db
            .checkout()
            .checkout(&[item(p.id, 3), item(p.id, 3)])
            .await
            .unwrap_err();
        match err {
            CheckoutError::Rejected(CoreError::InsufficientStock { available, .. }) => {
                assert_eq!(available, 2)
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(stock_of(&db, p.id).await, 5);
    }

    #[tokio::test]
    async fn test_invalid_requests_never_open_a_unit_of_work() {
        let db = setup().await;
        let p = add_product(&db, "Indomie", 3000, 5).await;

        let err = db.checkout().checkout(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert_eq!(err.kind(), "validation");

        let err = db.checkout().checkout(&[item(p.id, 0)]).await.unwrap_err();
        assert_eq!(err.kind(), "validation");

        assert_eq!(stock_of(&db, p.id).await, 5);
        assert_ledger_empty(&db).await;
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected() {
        let db = setup().await;
        let p = add_product(&db, "Gold", i64::MAX / 2, 10).await;

        let err = db.checkout().checkout(&[item(p.id, 3)]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::AmountOverflow { .. })
        ));
        assert_eq!(stock_of(&db, p.id).await, 10);
        assert_ledger_empty(&db).await;
    }

    #[tokio::test]
    async fn test_committed_transaction_reads_back_identically() {
        let db = setup().await;
        let a = add_product(&db, "A", 1000, 5).await;
        let b = add_product(&db, "B", 2000, 5).await;

        let tx = db
            .checkout()
            .checkout(&[item(a.id, 1), item(b.id, 2)])
            .await
            .unwrap();

        let stored = db.transactions().get_by_id(tx.id).await.unwrap().unwrap();
        assert_eq!(stored, tx);
        assert!(db.transactions().get_by_id(tx.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_name_survives_rename() {
        let db = setup().await;
        let p = add_product(&db, "Indomie", 3000, 5).await;
        let tx = db.checkout().checkout(&[item(p.id, 1)]).await.unwrap();

        db.products()
            .update(
                p.id,
                &NewProduct {
                    name: "Indomie Goreng".to_string(),
                    price: 3500,
                    stock: 4,
                },
            )
            .await
            .unwrap();

        let stored = db.transactions().get_by_id(tx.id).await.unwrap().unwrap();
        assert_eq!(stored.details[0].product_name, "Indomie");
        assert_eq!(stored.details[0].subtotal, 3000);
    }

    #[tokio::test]
    async fn test_product_in_ledger_cannot_be_deleted() {
        let db = setup().await;
        let p = add_product(&db, "Indomie", 3000, 5).await;
        db.checkout().checkout(&[item(p.id, 1)]).await.unwrap();

        assert!(matches!(
            db.products().delete(p.id).await,
            Err(crate::CatalogError::InUse(_))
        ));
        assert!(db.products().get_by_id(p.id).await.unwrap().is_some());
    }
}
