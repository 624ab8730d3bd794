//! # Report Repository
//!
//! Read-only sales aggregates over the committed ledger.
//!
//! ```text
//! transactions ──┬── SUM(total_amount), COUNT(*)        → revenue, count
//!                │
//!                └── transaction_details
//!                      GROUP BY product_id
//!                      ORDER BY SUM(quantity) DESC, product_id ASC
//!                      LIMIT 1                          → best seller
//! ```
//!
//! Dates are UTC calendar dates, inclusive on both ends. Both queries run in
//! one read transaction so they see the same snapshot.
//!
//! `created_at` is RFC 3339 text in UTC, so a day's rows sort between
//! `YYYY-MM-DD` and the next day's `YYYY-MM-DD`. Filtering on those bare
//! bounds keeps `idx_transactions_created_at` usable.

use chrono::Utc;
use kasir_core::{BestSellingProduct, DateRange, SalesSummary};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

const REVENUE_SQL: &str = r#"
    SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
    FROM transactions
    WHERE created_at >= ?1 AND created_at < ?2
"#;

const BEST_SELLER_SQL: &str = r#"
    SELECT p.name AS name, SUM(td.quantity) AS quantity
    FROM transactions t
    JOIN transaction_details td ON td.transaction_id = t.id
    JOIN products p ON p.id = td.product_id
    WHERE t.created_at >= ?1 AND t.created_at < ?2
    GROUP BY td.product_id
    ORDER BY SUM(td.quantity) DESC, td.product_id ASC
    LIMIT 1
"#;

/// Repository for sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Summary of today's (UTC) sales.
    pub async fn today_summary(&self) -> DbResult<SalesSummary> {
        self.range_summary(DateRange::day(Utc::now().date_naive()))
            .await
    }

    /// Summary of sales between two dates, inclusive.
    ///
    /// An empty window is not an error: revenue and count are zero and the
    /// best seller is absent.
    pub async fn range_summary(&self, range: DateRange) -> DbResult<SalesSummary> {
        debug!(start = %range.start(), end = %range.end(), "Computing sales summary");

        let mut tx = self.pool.begin().await?;

        let (total_revenue, total_transactions): (i64, i64) = sqlx::query_as(REVENUE_SQL)
            .bind(range.start())
            .bind(range.end_exclusive())
            .fetch_one(&mut *tx)
            .await?;

        let best_selling_product = sqlx::query_as::<_, BestSellingProduct>(BEST_SELLER_SQL)
            .bind(range.start())
            .bind(range.end_exclusive())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            total_revenue,
            total_transactions,
            has_best_seller = best_selling_product.is_some(),
            "Sales summary computed"
        );

        Ok(SalesSummary {
            total_revenue,
            total_transactions,
            best_selling_product,
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
    use chrono::NaiveDate;
    use kasir_core::{CheckoutItem, NewProduct};
    use sqlx::Row;

    async fn setup() -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = db
            .products()
            .create(&NewProduct {
                name: "Indomie".to_string(),
                price: 3000,
                stock: 100,
            })
            .await
            .unwrap();
        let b = db
            .products()
            .create(&NewProduct {
                name: "Teh Botol".to_string(),
                price: 5000,
                stock: 100,
            })
            .await
            .unwrap();
        (db, a.id, b.id)
    }

    fn item(product_id: i64, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            product_id,
            quantity,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Writes a ledger entry with a fixed timestamp.
    async fn insert_dated(db: &Database, product_id: i64, quantity: i64, subtotal: i64, at: &str) {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (total_amount, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(subtotal)
        .bind(at)
        .fetch_one(db.pool())
        .await
        .unwrap();

        sqlx::query(
            r#"
            INSERT INTO transaction_details
                (transaction_id, product_id, product_name, quantity, subtotal)
            VALUES (?1, ?2, 'snapshot', ?3, ?4)
            "#,
        )
        .bind(id)
        .bind(product_id)
        .bind(quantity)
        .bind(subtotal)
        .execute(db.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        let (db, _, _) = setup().await;
        let summary = db.reports().today_summary().await.unwrap();

        assert_eq!(summary, SalesSummary::default());
        assert!(summary.best_selling_product.is_none());
    }

    #[tokio::test]
    async fn test_today_summary_counts_checkouts() {
        let (db, a, b) = setup().await;

        db.checkout().checkout(&[item(a, 2)]).await.unwrap();
        db.checkout()
            .checkout(&[item(a, 1), item(b, 1)])
            .await
            .unwrap();

        let summary = db.reports().today_summary().await.unwrap();
        assert_eq!(summary.total_transactions, 2);
        assert_eq!(summary.total_revenue, 6000 + 3000 + 5000);

        let best = summary.best_selling_product.unwrap();
        assert_eq!(best.name, "Indomie");
        assert_eq!(best.quantity, 3);
    }

    #[tokio::test]
    async fn test_today_summary_is_idempotent() {
        let (db, a, _) = setup().await;
        db.checkout().checkout(&[item(a, 4)]).await.unwrap();

        let first = db.reports().today_summary().await.unwrap();
        let second = db.reports().today_summary().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_range_is_inclusive_and_excludes_outside() {
        let (db, a, b) = setup().await;

        insert_dated(&db, a, 1, 3000, "2026-01-01T00:00:00+00:00").await;
        insert_dated(&db, b, 2, 10000, "2026-01-31T23:59:59.999+00:00").await;
        insert_dated(&db, a, 5, 15000, "2026-02-01T00:00:00+00:00").await;

        let range = DateRange::new(date("2026-01-01"), date("2026-01-31")).unwrap();
        let summary = db.reports().range_summary(range).await.unwrap();

        assert_eq!(summary.total_transactions, 2);
        assert_eq!(summary.total_revenue, 13000);
        let best = summary.best_selling_product.unwrap();
        assert_eq!(best.name, "Teh Botol");
        assert_eq!(best.quantity, 2);
    }

    #[tokio::test]
    async fn test_best_seller_tie_prefers_lowest_product_id() {
        let (db, a, b) = setup().await;

        insert_dated(&db, b, 3, 15000, "2026-03-10T08:00:00+00:00").await;
        insert_dated(&db, a, 3, 9000, "2026-03-10T09:00:00+00:00").await;

        let summary = db
            .reports()
            .range_summary(DateRange::day(date("2026-03-10")))
            .await
            .unwrap();

        let best = summary.best_selling_product.unwrap();
        assert!(a < b);
        assert_eq!(best.name, "Indomie");
    }

    #[tokio::test]
    async fn test_best_seller_uses_current_catalog_name() {
        let (db, a, _) = setup().await;
        insert_dated(&db, a, 1, 3000, "2026-04-01T12:00:00+00:00").await;

        db.products()
            .update(
                a,
                &NewProduct {
                    name: "Indomie Goreng".to_string(),
                    price: 3000,
                    stock: 99,
                },
            )
            .await
            .unwrap();

        let summary = db
            .reports()
            .range_summary(DateRange::day(date("2026-04-01")))
            .await
            .unwrap();
        assert_eq!(summary.best_selling_product.unwrap().name, "Indomie Goreng");
    }

    #[tokio::test]
    async fn test_day_bounds_are_half_open() {
        let (db, a, _) = setup().await;

        insert_dated(&db, a, 1, 3000, "2026-05-09T23:59:59.999999999+00:00").await;
        insert_dated(&db, a, 2, 6000, "2026-05-10T00:00:00+00:00").await;
        insert_dated(&db, a, 3, 9000, "2026-05-10T23:59:59.999999999+00:00").await;
        insert_dated(&db, a, 4, 12000, "2026-05-11T00:00:00+00:00").await;

        let summary = db
            .reports()
            .range_summary(DateRange::day(date("2026-05-10")))
            .await
            .unwrap();

        assert_eq!(summary.total_transactions, 2);
        assert_eq!(summary.total_revenue, 15000);
        assert_eq!(summary.best_selling_product.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_range_filter_uses_created_at_index() {
        let (db, _, _) = setup().await;

        let plan = sqlx::query(&format!("EXPLAIN QUERY PLAN {REVENUE_SQL}"))
            .bind(date("2026-01-01"))
            .bind(date("2026-02-01"))
            .fetch_all(db.pool())
            .await
            .unwrap();

        let details: Vec<String> = plan.iter().map(|row| row.get("detail")).collect();
        assert!(
            details
                .iter()
                .any(|d| d.contains("idx_transactions_created_at")),
            "{details:?}"
        );
    }
}
