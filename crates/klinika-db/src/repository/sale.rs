//! # Sale Repository
//!
//! The sale transaction processor: the one operation in the system that
//! touches three tables and must never leave partial effects behind.
//!
//! ## Sale Creation
//! ```text
//! create(input, now)
//!   │
//!   ├── validate input (empty items, quantities, amount) - no DB access
//!   │
//!   ├── BEGIN TRANSACTION
//!   │     for each requested item, in submitted order:
//!   │       ├── load product            → NotFound on missing id
//!   │       ├── guarded stock decrement → InsufficientStock when
//!   │       │                             stock_quantity < quantity
//!   │       └── snapshot unit_price, total_price = qty × unit_price
//!   │     total_amount  = Σ total_price
//!   │     change_amount = max(0, amount_paid - total_amount)
//!   │     INSERT sale header
//!   │     INSERT sale items
//!   ├── COMMIT
//!   │
//!   └── any error above rolls the whole thing back:
//!       no sale, no items, no stock change
//! ```
//!
//! The guarded decrement (`WHERE id = ? AND stock_quantity >= ?`) is
//! what closes the lost-update race: two concurrent sales draining the
//! same product cannot both succeed past the remaining stock.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use klinika_core::{CreateSaleInput, Money, Product, Sale, SaleItem};

const SALE_COLUMNS: &str = "id, sale_number, customer_name, total_amount, amount_paid, \
                            change_amount, payment_method, sale_date, created_at";

const SALE_ITEM_COLUMNS: &str =
    "id, sale_id, product_id, quantity, unit_price, total_price, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Processes a sale: header, line items, and stock decrements in one
    /// transaction.
    ///
    /// Unit prices are snapshotted from the catalog inside the
    /// transaction; callers only say what and how many. Totals and
    /// change are computed here, never taken from the request.
    ///
    /// ## Errors
    /// * [`DbError::Validation`] - empty items, bad quantity, non-positive amount
    /// * [`DbError::NotFound`] - an item references a missing product
    /// * [`DbError::InsufficientStock`] - an item over-demands a product
    /// * [`DbError::UniqueViolation`] - duplicate sale_number
    ///
    /// On any of these the database is left exactly as it was.
    pub async fn create(&self, input: &CreateSaleInput, now: DateTime<Utc>) -> DbResult<Sale> {
        input.validate()?;

        let sale_number = match &input.sale_number {
            Some(number) => number.clone(),
            None => generate_sale_number(now),
        };

        debug!(sale_number = %sale_number, items = input.items.len(), "Processing sale");

        let mut tx = self.pool.begin().await?;

        // Resolve every line against the catalog and take the stock,
        // in the order the items were submitted.
        let mut lines: Vec<(i64, i64, Money, Money)> = Vec::with_capacity(input.items.len());
        let mut total_amount = Money::zero();

        for item in &input.items {
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, name, description, unit_price, stock_quantity, created_at, updated_at \
                 FROM non_medical_products WHERE id = ?1",
            )
                .bind(item.product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Product", item.product_id))?;

            let updated = sqlx::query(
                r#"
                UPDATE non_medical_products
                SET stock_quantity = stock_quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND stock_quantity >= ?2
                "#,
            )
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(DbError::InsufficientStock {
                    product_id: product.id,
                    name: product.name,
                    available: product.stock_quantity,
                    requested: item.quantity,
                });
            }

            let unit_price = product.unit_price;
            let total_price = unit_price * item.quantity;
            total_amount += total_price;
            lines.push((item.product_id, item.quantity, unit_price, total_price));
        }

        let change_amount = (input.amount_paid - total_amount).clamp_zero();

        let header = sqlx::query(
            r#"
            INSERT INTO sales (sale_number, customer_name, total_amount, amount_paid,
                               change_amount, payment_method, sale_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&sale_number)
        .bind(&input.customer_name)
        .bind(total_amount)
        .bind(input.amount_paid)
        .bind(change_amount)
        .bind(input.payment_method)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let sale_id = header.last_insert_rowid();

        for (product_id, quantity, unit_price, total_price) in &lines {
            sqlx::query(
                r#"
                INSERT INTO sale_items (sale_id, product_id, quantity,
                                        unit_price, total_price, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(sale_id)
            .bind(product_id)
            .bind(quantity)
            .bind(unit_price)
            .bind(total_price)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            sale_id,
            sale_number = %sale_number,
            total = %total_amount,
            items = lines.len(),
            "Sale committed"
        );

        Ok(Sale {
            id: sale_id,
            sale_number,
            customer_name: input.customer_name.clone(),
            total_amount,
            amount_paid: input.amount_paid,
            change_amount,
            payment_method: input.payment_method,
            sale_date: now,
            created_at: now,
        })
    }

    /// Lists all sales, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date DESC, id DESC");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gets the line items of a sale, in insertion order.
    pub async fn items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let sql = format!("SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY id");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }
}

/// Generates a receipt code in format `POS-YYYYMMDD-NNNN`.
///
/// The suffix comes from the clock's millisecond remainder; the UNIQUE
/// constraint on sale_number catches the rare collision.
// TODO: replace the suffix with a per-day counter once one exists
pub fn generate_sale_number(now: DateTime<Utc>) -> String {
    let seq = (now.timestamp_millis() % 10000).unsigned_abs();
    format!("POS-{}-{:04}", now.format("%Y%m%d"), seq)
}

// =============================================================================
// Unit Tests
// =============================================================================
