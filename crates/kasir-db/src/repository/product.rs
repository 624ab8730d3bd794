//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Catalog CRUD (validated before any SQL runs)
//! - Locked read and conditional decrement for the checkout engine
//!
//! ## Two Kinds of Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog (ProductRepository, pool-backed)                               │
//! │    list / get_by_id / create / update / delete                          │
//! │    single-statement writes, autocommit                                  │
//! │                                                                         │
//! │  Inventory (free functions, UnitOfWork-backed)                          │
//! │    lock_for_checkout(&mut uow, id)                                      │
//! │        UPDATE products SET stock = stock WHERE id = ?                   │
//! │        RETURNING id, name, price, stock                                 │
//! │        └─ takes the write lock; competing checkouts wait here           │
//! │    decrement_stock(&mut uow, id, qty)                                   │
//! │        UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?│
//! │        └─ zero rows affected means the stock is no longer there         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kasir_core::checkout::StockRow;
use kasir_core::validation::validate_new_product;
use kasir_core::{NewProduct, Product};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult, DbError, DbResult};
use crate::unit_of_work::UnitOfWork;

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let noodles = repo.list(Some("indomie")).await?;
/// let product = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by id.
    ///
    /// ## Arguments
    /// * `name` - Optional case-insensitive substring filter on the name.
    ///   Blank filters are ignored.
    pub async fn list(&self, name: Option<&str>) -> DbResult<Vec<Product>> {
        let filter = name.map(str::trim).filter(|n| !n.is_empty());

        debug!(filter = ?filter, "Listing products");

        let products = match filter {
            Some(needle) => {
                sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price, stock
                    FROM products
                    WHERE name LIKE '%' || ?1 || '%' ESCAPE '\'
                    ORDER BY id
                    "#,
                )
                .bind(escape_like(needle))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    "SELECT id, name, price, stock FROM products ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, stock FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Validates and inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(CatalogError::Validation)` - Empty name, price ≤ 0 or stock < 0
    pub async fn create(&self, input: &NewProduct) -> CatalogResult<Product> {
        let input = validate_new_product(input)?;

        debug!(name = %input.name, "Inserting product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, stock)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, price, stock
            "#,
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        debug!(id = product.id, "Product created");
        Ok(product)
    }

    /// Replaces name, price and stock of an existing product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product as stored after the update
    /// * `Err(CatalogError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, input: &NewProduct) -> CatalogResult<Product> {
        let input = validate_new_product(input)?;

        debug!(id, "Updating product");

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = ?2, price = ?3, stock = ?4
            WHERE id = ?1
            RETURNING id, name, price, stock
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        product.ok_or(CatalogError::NotFound(id))
    }

    /// Deletes a product.
    ///
    /// Products that appear in the ledger cannot be deleted: the foreign key
    /// from `transaction_details` refuses it and this returns
    /// [`CatalogError::InUse`].
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from);

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(CatalogError::NotFound(id)),
            Ok(_) => Ok(()),
            Err(DbError::ForeignKeyViolation { .. }) => Err(CatalogError::InUse(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Inventory access (inside a unit of work only)
// =============================================================================

/// Locked read of a product row for checkout.
///
/// The no-op `UPDATE` acquires SQLite's write lock, so a concurrent checkout
/// blocks here (up to the busy timeout) until this unit of work ends, then
/// sees the committed stock.
///
/// ## Returns
/// * `Ok(Some(StockRow))` - Current state, now locked
/// * `Ok(None)` - No such product
/// * `Err(DbError::Busy)` - Lock wait exceeded the busy timeout
pub async fn lock_for_checkout(uow: &mut UnitOfWork, product_id: i64) -> DbResult<Option<StockRow>> {
    let row = sqlx::query_as::<_, StockRow>(
        r#"
        UPDATE products
        SET stock = stock
        WHERE id = ?1
        RETURNING id, name, price, stock
        "#,
    )
    .bind(product_id)
    .fetch_optional(uow.conn())
    .await?;

    debug!(product_id, found = row.is_some(), "Locked product row");
    Ok(row)
}

/// Decrements stock by `quantity`, refusing to go below zero.
///
/// ## Returns
/// * `Ok(true)` - Stock decremented
/// * `Ok(false)` - Row missing or `stock < quantity`; nothing changed
pub async fn decrement_stock(uow: &mut UnitOfWork, product_id: i64, quantity: i64) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .execute(uow.conn())
    .await?;

    debug!(product_id, quantity, "Decremented stock");
    Ok(result.rows_affected() == 1)
}

/// Escapes LIKE wildcards so the filter matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
