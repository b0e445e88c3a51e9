//! # Billing Repository
//!
//! Bills and the payments recorded against them. Structurally parallel
//! to the sale processor, minus stock: a bill plus its service lines
//! commit in one transaction, with totals computed from price snapshots
//! rather than taken from the caller.
//!
//! ## Settlement
//! Recording a payment re-derives the bill's `payment_status` in the
//! same transaction: once the sum of recorded payments covers
//! `total_amount`, the bill flips to `paid`. Overdue marking stays a
//! manual `update_bill` action (the original workflow had the front
//! desk do it).

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use klinika_core::{
    Bill, BillService, CreateBillInput, CreatePaymentInput, Money, Payment, PaymentStatus,
    UpdateBillInput,
};

const BILL_COLUMNS: &str = "id, patient_id, bill_number, bill_date, subtotal, tax_amount, \
                            total_amount, payment_status, notes, created_at, updated_at";

const BILL_SERVICE_COLUMNS: &str =
    "id, bill_id, service_id, quantity, unit_price, total_price, created_at";

const PAYMENT_COLUMNS: &str = "id, bill_id, amount, payment_method, payment_date, \
                               reference_number, notes, created_at";

/// Repository for bill and payment database operations.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    pool: SqlitePool,
}

impl BillingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BillingRepository { pool }
    }

    /// Gets a bill by id.
    pub async fn get_bill(&self, id: i64) -> DbResult<Option<Bill>> {
        let sql = format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1");
        let bill = sqlx::query_as::<_, Bill>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bill)
    }

    /// Creates a bill with its service lines in one transaction.
    ///
    /// Each line snapshots the current service price;
    /// `subtotal = Σ quantity × unit_price` and
    /// `total_amount = subtotal + tax_amount`. A missing patient or
    /// service rolls everything back.
    pub async fn create_bill(&self, input: &CreateBillInput, now: DateTime<Utc>) -> DbResult<Bill> {
        input.validate()?;

        debug!(
            bill_number = %input.bill_number,
            services = input.services.len(),
            "Creating bill"
        );

        let mut tx = self.pool.begin().await?;

        let patient: Option<i64> = sqlx::query_scalar("SELECT id FROM patients WHERE id = ?1")
            .bind(input.patient_id)
            .fetch_optional(&mut *tx)
            .await?;
        if patient.is_none() {
            return Err(DbError::not_found("Patient", input.patient_id));
        }

        // Snapshot service prices and accumulate the subtotal
        let mut lines: Vec<(i64, i64, Money, Money)> = Vec::with_capacity(input.services.len());
        let mut subtotal = Money::zero();

        for line in &input.services {
            let price: Option<Money> = sqlx::query_scalar("SELECT price FROM services WHERE id = ?1")
                .bind(line.service_id)
                .fetch_optional(&mut *tx)
                .await?;
            let unit_price = price.ok_or_else(|| DbError::not_found("Service", line.service_id))?;

            let total_price = unit_price * line.quantity;
            subtotal += total_price;
            lines.push((line.service_id, line.quantity, unit_price, total_price));
        }

        let tax_amount = input.tax_amount.unwrap_or_default();
        let total_amount = subtotal + tax_amount;

        let header = sqlx::query(
            r#"
            INSERT INTO bills (patient_id, bill_number, bill_date, subtotal, tax_amount,
                               total_amount, payment_status, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(input.patient_id)
        .bind(&input.bill_number)
        .bind(now)
        .bind(subtotal)
        .bind(tax_amount)
        .bind(total_amount)
        .bind(PaymentStatus::Pending)
        .bind(&input.notes)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let bill_id = header.last_insert_rowid();

        for (service_id, quantity, unit_price, total_price) in &lines {
            sqlx::query(
                r#"
                INSERT INTO bill_services (bill_id, service_id, quantity,
                                           unit_price, total_price, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(bill_id)
            .bind(service_id)
            .bind(quantity)
            .bind(unit_price)
            .bind(total_price)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(bill_id, total = %total_amount, "Bill created");

        Ok(Bill {
            id: bill_id,
            patient_id: input.patient_id,
            bill_number: input.bill_number.clone(),
            bill_date: now,
            subtotal,
            tax_amount,
            total_amount,
            payment_status: PaymentStatus::Pending,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update (status override, notes).
    pub async fn update_bill(&self, input: &UpdateBillInput, now: DateTime<Utc>) -> DbResult<Bill> {
        let mut bill = self
            .get_bill(input.bill_id)
            .await?
            .ok_or_else(|| DbError::not_found("Bill", input.bill_id))?;

        if let Some(status) = input.payment_status {
            bill.payment_status = status;
        }
        if input.notes.is_some() {
            bill.notes = input.notes.clone();
        }
        bill.updated_at = now;

        sqlx::query(
            r#"
            UPDATE bills SET payment_status = ?2, notes = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(bill.id)
        .bind(bill.payment_status)
        .bind(&bill.notes)
        .bind(bill.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Lists all bills, most recent first.
    pub async fn list_bills(&self) -> DbResult<Vec<Bill>> {
        let sql = format!("SELECT {BILL_COLUMNS} FROM bills ORDER BY bill_date DESC, id DESC");
        let bills = sqlx::query_as::<_, Bill>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(bills)
    }

    /// Gets the service lines of a bill.
    pub async fn bill_services(&self, bill_id: i64) -> DbResult<Vec<BillService>> {
        let sql = format!(
            "SELECT {BILL_SERVICE_COLUMNS} FROM bill_services WHERE bill_id = ?1 ORDER BY id"
        );
        let services = sqlx::query_as::<_, BillService>(&sql)
            .bind(bill_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(services)
    }

    /// Records a payment and settles the bill when covered.
    ///
    /// Insert and settlement run in one transaction so the bill status
    /// can never disagree with the recorded payments.
    pub async fn create_payment(
        &self,
        input: &CreatePaymentInput,
        now: DateTime<Utc>,
    ) -> DbResult<Payment> {
        input.validate()?;

        debug!(bill_id = input.bill_id, amount = %input.amount, "Recording payment");

        let mut tx = self.pool.begin().await?;

        let bill_sql = format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1");
        let bill = sqlx::query_as::<_, Bill>(&bill_sql)
            .bind(input.bill_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Bill", input.bill_id))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO payments (bill_id, amount, payment_method, payment_date,
                                  reference_number, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(input.bill_id)
        .bind(input.amount)
        .bind(input.payment_method)
        .bind(now)
        .bind(&input.reference_number)
        .bind(&input.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let paid_to_date: Option<Money> =
            sqlx::query_scalar("SELECT SUM(amount) FROM payments WHERE bill_id = ?1")
                .bind(input.bill_id)
                .fetch_one(&mut *tx)
                .await?;
        let paid_to_date = paid_to_date.unwrap_or_default();

        if paid_to_date >= bill.total_amount && bill.payment_status != PaymentStatus::Paid {
            sqlx::query("UPDATE bills SET payment_status = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(bill.id)
                .bind(PaymentStatus::Paid)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!(
            bill_id = input.bill_id,
            paid_to_date = %paid_to_date,
            total = %bill.total_amount,
            "Payment recorded"
        );

        Ok(Payment {
            id: inserted.last_insert_rowid(),
            bill_id: input.bill_id,
            amount: input.amount,
            payment_method: input.payment_method,
            payment_date: now,
            reference_number: input.reference_number.clone(),
            notes: input.notes.clone(),
            created_at: now,
        })
    }

    /// Lists payments, optionally scoped to one bill.
    pub async fn list_payments(&self, bill_id: Option<i64>) -> DbResult<Vec<Payment>> {
        let payments = match bill_id {
            Some(bill_id) => {
                let sql = format!(
                    "SELECT {PAYMENT_COLUMNS} FROM payments WHERE bill_id = ?1 ORDER BY id"
                );
                sqlx::query_as::<_, Payment>(&sql)
                    .bind(bill_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY id");
                sqlx::query_as::<_, Payment>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(payments)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
