//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► CatalogError  (product CRUD)                                │
//! │       └──► CheckoutError (checkout engine)                             │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  ApiError (apps/api) ← `kind` + status code for the client             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_core::{CoreError, ValidationError};
use thiserror::Error;

/// SQLite primary/extended result codes that mean "could not get the lock".
///
/// 5 = SQLITE_BUSY, 261 = SQLITE_BUSY_RECOVERY,
/// 6 = SQLITE_LOCKED, 517 = SQLITE_BUSY_SNAPSHOT.
const SQLITE_BUSY_CODES: [&str; 4] = ["5", "261", "6", "517"];

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for logging and for the HTTP layer's status mapping.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_optional` returns no rows for a lookup by id
    /// - `UPDATE`/`DELETE` affects zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Deleting a product that is referenced by a transaction detail
    /// - Inserting a detail for a transaction that does not exist
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation.
    ///
    /// ## When This Occurs
    /// - A write would store `stock < 0` or `price <= 0`
    #[error("Check constraint failed: {message}")]
    CheckViolation { message: String },

    /// The database stayed locked for longer than the busy timeout.
    ///
    /// ## When This Occurs
    /// - A checkout waited on a competing checkout's lock past `lock_timeout`
    #[error("Database is busy: {0}")]
    Busy(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// True when the error means the caller may retry later.
    pub fn is_busy(&self) -> bool {
        matches!(self, DbError::Busy(_) | DbError::PoolExhausted)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → busy code / constraint type / QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                let code = db_err.code();

                if code
                    .as_deref()
                    .is_some_and(|c| SQLITE_BUSY_CODES.contains(&c))
                    || msg.contains("database is locked")
                {
                    DbError::Busy(msg.to_string())
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Catalog Error
// =============================================================================

/// Errors from product create/read/update/delete.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Input rejected before reaching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Product not found: {0}")]
    NotFound(i64),

    /// Product is referenced by the ledger and cannot be deleted.
    #[error("Product {0} is referenced by recorded transactions")]
    InUse(i64),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Checkout Error
// =============================================================================

/// Errors from the checkout engine.
///
/// Every variant means the unit of work was rolled back: no stock moved and
/// no ledger row was written.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A business rule rejected the request (bad input, unknown product,
    /// not enough stock, amount overflow).
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// Could not acquire the inventory lock within the configured timeout.
    #[error("Checkout timed out waiting for inventory lock")]
    Busy,

    /// Storage failed while reading, writing or committing.
    #[error("Checkout persistence failed: {0}")]
    Persistence(DbError),
}

impl CheckoutError {
    /// Stable machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::Rejected(CoreError::ProductNotFound(_)) => "product_not_found",
            CheckoutError::Rejected(CoreError::InsufficientStock { .. }) => "insufficient_stock",
            CheckoutError::Rejected(CoreError::AmountOverflow { .. })
            | CheckoutError::Rejected(CoreError::Validation(_)) => "validation",
            CheckoutError::Busy => "busy",
            CheckoutError::Persistence(_) => "internal",
        }
    }
}

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::Rejected(CoreError::Validation(err))
    }
}

impl From<DbError> for CheckoutError {
    fn from(err: DbError) -> Self {
        if err.is_busy() {
            CheckoutError::Busy
        } else {
            CheckoutError::Persistence(err)
        }
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================
