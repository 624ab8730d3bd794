//! # Unit of Work
//!
//! A transactional boundary: everything executed through it commits or rolls
//! back together.
//!
//! ```text
//! let mut uow = db.begin().await?;          BEGIN
//! products::lock_for_checkout(&mut uow, 1)  UPDATE ... RETURNING (write lock)
//! products::decrement_stock(&mut uow, ..)   UPDATE ... WHERE stock >= ?
//! ledger::insert_transaction(&mut uow, ..)  INSERT ... RETURNING id
//! uow.commit().await?;                      COMMIT
//!
//! any `?` before commit ──► UnitOfWork dropped ──► ROLLBACK
//! ```
//!
//! Inventory and ledger writes take `&mut UnitOfWork`, so they cannot run
//! outside one.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DbResult;

/// An open SQLite transaction. Dropping it without [`commit`](Self::commit)
/// rolls it back.
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Acquires a connection from the pool and issues `BEGIN`.
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool.begin().await?;
        debug!("Unit of work started");
        Ok(UnitOfWork { tx })
    }

    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }

    pub async fn rollback(self) -> DbResult<()> {
        self.tx.rollback().await?;
        debug!("Unit of work rolled back");
        Ok(())
    }

    /// The connection the transaction runs on, for use as a sqlx executor.
    pub(crate) fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }
}
