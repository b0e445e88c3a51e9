//! # Medicine Repository
//!
//! Pharmacy catalog. Dispensing is a separate workflow; creating a
//! prescription does not touch medicine stock.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use klinika_core::{CreateMedicineInput, Medicine, UpdateMedicineInput};

const MEDICINE_COLUMNS: &str = "id, name, description, dosage_form, strength, manufacturer, \
                                unit_price, stock_quantity, expiry_date, created_at, updated_at";

/// Repository for medicine database operations.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Gets a medicine by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Medicine>> {
        let sql = format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ?1");
        let medicine = sqlx::query_as::<_, Medicine>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(medicine)
    }

    /// Adds a medicine to the catalog.
    pub async fn create(&self, input: &CreateMedicineInput, now: DateTime<Utc>) -> DbResult<Medicine> {
        input.validate()?;

        debug!(name = %input.name, "Creating medicine");

        let stock = input.stock_quantity.unwrap_or(0);

        let result = sqlx::query(
            r#"
            INSERT INTO medicines (
                name, description, dosage_form, strength, manufacturer,
                unit_price, stock_quantity, expiry_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.dosage_form)
        .bind(&input.strength)
        .bind(&input.manufacturer)
        .bind(input.unit_price)
        .bind(stock)
        .bind(input.expiry_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Medicine {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
            dosage_form: input.dosage_form.clone(),
            strength: input.strength.clone(),
            manufacturer: input.manufacturer.clone(),
            unit_price: input.unit_price,
            stock_quantity: stock,
            expiry_date: input.expiry_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update to a catalog entry.
    pub async fn update(&self, input: &UpdateMedicineInput, now: DateTime<Utc>) -> DbResult<Medicine> {
        input.validate()?;

        let mut medicine = self
            .get_by_id(input.medicine_id)
            .await?
            .ok_or_else(|| DbError::not_found("Medicine", input.medicine_id))?;

        if let Some(name) = &input.name {
            medicine.name = name.clone();
        }
        if input.description.is_some() {
            medicine.description = input.description.clone();
        }
        if input.dosage_form.is_some() {
            medicine.dosage_form = input.dosage_form.clone();
        }
        if input.strength.is_some() {
            medicine.strength = input.strength.clone();
        }
        if input.manufacturer.is_some() {
            medicine.manufacturer = input.manufacturer.clone();
        }
        if let Some(price) = input.unit_price {
            medicine.unit_price = price;
        }
        if let Some(stock) = input.stock_quantity {
            medicine.stock_quantity = stock;
        }
        if input.expiry_date.is_some() {
            medicine.expiry_date = input.expiry_date;
        }
        medicine.updated_at = now;

        sqlx::query(
            r#"
            UPDATE medicines SET
                name = ?2, description = ?3, dosage_form = ?4, strength = ?5,
                manufacturer = ?6, unit_price = ?7, stock_quantity = ?8,
                expiry_date = ?9, updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(medicine.id)
        .bind(&medicine.name)
        .bind(&medicine.description)
        .bind(&medicine.dosage_form)
        .bind(&medicine.strength)
        .bind(&medicine.manufacturer)
        .bind(medicine.unit_price)
        .bind(medicine.stock_quantity)
        .bind(medicine.expiry_date)
        .bind(medicine.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(medicine)
    }

    /// Lists the medicine catalog.
    pub async fn list(&self) -> DbResult<Vec<Medicine>> {
        let sql = format!("SELECT {MEDICINE_COLUMNS} FROM medicines ORDER BY name");
        let medicines = sqlx::query_as::<_, Medicine>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(medicines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use klinika_core::Money;

    fn medicine_input(name: &str, price_cents: i64) -> CreateMedicineInput {
        CreateMedicineInput {
            name: name.to_string(),
            description: None,
            dosage_form: Some("tablet".to_string()),
            strength: Some("500mg".to_string()),
            manufacturer: None,
            unit_price: Money::from_cents(price_cents),
            stock_quantity: Some(120),
            expiry_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_price_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let medicine = db
            .medicines()
            .create(&medicine_input("Paracetamol", 350), Utc::now())
            .await
            .unwrap();

        let fetched = db.medicines().get_by_id(medicine.id).await.unwrap().unwrap();
        assert_eq!(fetched.unit_price, Money::from_cents(350));
        assert_eq!(fetched.stock_quantity, 120);
    }

    #[tokio::test]
    async fn test_update_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let medicine = db
            .medicines()
            .create(&medicine_input("Paracetamol", 350), Utc::now())
            .await
            .unwrap();

        let updated = db
            .medicines()
            .update(
                &UpdateMedicineInput {
                    medicine_id: medicine.id,
                    name: None,
                    description: None,
                    dosage_form: None,
                    strength: None,
                    manufacturer: None,
                    unit_price: Some(Money::from_cents(400)),
                    stock_quantity: None,
                    expiry_date: None,
                },
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(updated.unit_price, Money::from_cents(400));
        assert_eq!(updated.name, "Paracetamol");
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.medicines()
            .create(&medicine_input("Ibuprofen", 500), Utc::now())
            .await
            .unwrap();
        db.medicines()
            .create(&medicine_input("Amoxicillin", 800), Utc::now())
            .await
            .unwrap();

        let names: Vec<String> = db
            .medicines()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Amoxicillin", "Ibuprofen"]);
    }
}
