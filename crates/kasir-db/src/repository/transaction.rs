//! # Transaction Repository
//!
//! The append-only ledger: transaction headers and their detail lines.
//!
//! ## Write Path (checkout engine only)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert_transaction(&mut uow, total)                                   │
//! │     └── INSERT INTO transactions ... RETURNING id → (id, created_at)   │
//! │  insert_detail(&mut uow, id, line)   × N, in checkout input order      │
//! │     └── INSERT INTO transaction_details ... RETURNING id               │
//! │                                                                         │
//! │  No UPDATE or DELETE statement touches these tables.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use kasir_core::checkout::PendingLine;
use kasir_core::{Transaction, TransactionDetail};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::unit_of_work::UnitOfWork;

/// Header row as stored.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    total_amount: i64,
    created_at: DateTime<Utc>,
}

/// Read access to committed transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Gets a committed transaction with its details in line order.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let details = self.get_details(id).await?;

        Ok(Some(Transaction {
            id: header.id,
            total_amount: header.total_amount,
            created_at: header.created_at,
            details,
        }))
    }

    /// Gets the detail lines of a transaction, ordered by id (= input order).
    pub async fn get_details(&self, transaction_id: i64) -> DbResult<Vec<TransactionDetail>> {
        let details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT id, transaction_id, product_id, product_name, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Counts committed transactions (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Counts detail lines across all transactions.
    pub async fn count_details(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transaction_details")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Ledger writes (inside a unit of work only)
// =============================================================================

/// Inserts a transaction header stamped with the current time.
///
/// ## Returns
/// The assigned id and the timestamp that was stored.
pub async fn insert_transaction(
    uow: &mut UnitOfWork,
    total_amount: i64,
) -> DbResult<(i64, DateTime<Utc>)> {
    let created_at = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO transactions (total_amount, created_at)
        VALUES (?1, ?2)
        RETURNING id
        "#,
    )
    .bind(total_amount)
    .bind(created_at)
    .fetch_one(uow.conn())
    .await?;

    debug!(id, total_amount, "Inserted transaction header");
    Ok((id, created_at))
}

/// Inserts one detail line of a transaction.
pub async fn insert_detail(
    uow: &mut UnitOfWork,
    transaction_id: i64,
    line: &PendingLine,
) -> DbResult<TransactionDetail> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO transaction_details
            (transaction_id, product_id, product_name, quantity, subtotal)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id
        "#,
    )
    .bind(transaction_id)
    .bind(line.product_id)
    .bind(&line.product_name)
    .bind(line.quantity)
    .bind(line.subtotal.amount())
    .fetch_one(uow.conn())
    .await?;

    Ok(TransactionDetail {
        id,
        transaction_id,
        product_id: line.product_id,
        product_name: line.product_name.clone(),
        quantity: line.quantity,
        subtotal: line.subtotal.amount(),
    })
}
