//! # Product Repository
//!
//! Catalog of sellable non-medical items (vitamins, masks, supplies).
//!
//! ## Stock Updates
//! ```text
//! WRONG: read stock, check in Rust, write new value
//!        (two concurrent sales can both pass the check - lost update)
//!
//! RIGHT: UPDATE non_medical_products
//!        SET stock_quantity = stock_quantity - :qty
//!        WHERE id = :id AND stock_quantity >= :qty
//!        (the guard makes the check and the decrement one atomic step;
//!         zero affected rows means insufficient stock)
//! ```
//!
//! The same guarded statement is reused inside the sale transaction in
//! [`crate::repository::sale`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use klinika_core::{CreateProductInput, Product, UpdateProductInput};

const PRODUCT_COLUMNS: &str =
    "id, name, description, unit_price, stock_quantity, created_at, updated_at";

/// Repository for non-medical product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM non_medical_products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Adds a product to the catalog.
    pub async fn create(&self, input: &CreateProductInput, now: DateTime<Utc>) -> DbResult<Product> {
        input.validate()?;

        debug!(name = %input.name, "Creating product");

        let stock = input.stock_quantity.unwrap_or(0);

        let result = sqlx::query(
            r#"
            INSERT INTO non_medical_products (name, description, unit_price,
                                              stock_quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.unit_price)
        .bind(stock)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
            unit_price: input.unit_price,
            stock_quantity: stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update to a product.
    pub async fn update(&self, input: &UpdateProductInput, now: DateTime<Utc>) -> DbResult<Product> {
        input.validate()?;

        let mut product = self
            .get_by_id(input.product_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", input.product_id))?;

        if let Some(name) = &input.name {
            product.name = name.clone();
        }
        if input.description.is_some() {
            product.description = input.description.clone();
        }
        if let Some(price) = input.unit_price {
            product.unit_price = price;
        }
        if let Some(stock) = input.stock_quantity {
            product.stock_quantity = stock;
        }
        product.updated_at = now;

        sqlx::query(
            r#"
            UPDATE non_medical_products SET
                name = ?2, description = ?3, unit_price = ?4,
                stock_quantity = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.stock_quantity)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Atomically decrements stock, failing when not enough is on hand.
    ///
    /// The guard clause makes check-and-decrement a single statement, so
    /// no partial decrement is ever visible and two concurrent callers
    /// cannot both take the last unit.
    ///
    /// ## Returns
    /// The product with its post-decrement stock, or
    /// [`DbError::NotFound`] / [`DbError::InsufficientStock`].
    pub async fn decrement_stock(
        &self,
        id: i64,
        amount: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Product> {
        debug!(id, amount, "Decrementing product stock");

        let result = sqlx::query(
            r#"
            UPDATE non_medical_products
            SET stock_quantity = stock_quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing product from an over-demand
            let product = self
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", id))?;
            return Err(DbError::InsufficientStock {
                product_id: id,
                name: product.name,
                available: product.stock_quantity,
                requested: amount,
            });
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Lists the product catalog.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM non_medical_products ORDER BY name");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }
}
