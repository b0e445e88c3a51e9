//! # Prescription Repository
//!
//! A prescription and its medicine lines are created atomically; a bad
//! medicine reference rolls the whole prescription back.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use klinika_core::{CreatePrescriptionInput, Prescription, PrescriptionItem};

const PRESCRIPTION_COLUMNS: &str = "id, patient_id, doctor_id, medical_record_id, \
                                    prescription_date, instructions, created_at";

const ITEM_COLUMNS: &str =
    "id, prescription_id, medicine_id, quantity, dosage_instructions, created_at";

/// Repository for prescription database operations.
#[derive(Debug, Clone)]
pub struct PrescriptionRepository {
    pool: SqlitePool,
}

impl PrescriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PrescriptionRepository { pool }
    }

    /// Writes a prescription and its items in one transaction.
    ///
    /// Validates that the patient, doctor, optional medical record, and
    /// every referenced medicine exist. Creating a prescription does not
    /// decrement medicine stock; dispensing is a separate step.
    pub async fn create(
        &self,
        input: &CreatePrescriptionInput,
        now: DateTime<Utc>,
    ) -> DbResult<Prescription> {
        input.validate()?;

        debug!(
            patient_id = input.patient_id,
            doctor_id = input.doctor_id,
            items = input.items.len(),
            "Creating prescription"
        );

        let mut tx = self.pool.begin().await?;

        let patient: Option<i64> = sqlx::query_scalar("SELECT id FROM patients WHERE id = ?1")
            .bind(input.patient_id)
            .fetch_optional(&mut *tx)
            .await?;
        if patient.is_none() {
            return Err(DbError::not_found("Patient", input.patient_id));
        }

        let doctor: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?1")
            .bind(input.doctor_id)
            .fetch_optional(&mut *tx)
            .await?;
        if doctor.is_none() {
            return Err(DbError::not_found("Doctor", input.doctor_id));
        }

        if let Some(record_id) = input.medical_record_id {
            let record: Option<i64> =
                sqlx::query_scalar("SELECT id FROM medical_records WHERE id = ?1")
                    .bind(record_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if record.is_none() {
                return Err(DbError::not_found("Medical record", record_id));
            }
        }

        for item in &input.items {
            let medicine: Option<i64> = sqlx::query_scalar("SELECT id FROM medicines WHERE id = ?1")
                .bind(item.medicine_id)
                .fetch_optional(&mut *tx)
                .await?;
            if medicine.is_none() {
                return Err(DbError::not_found("Medicine", item.medicine_id));
            }
        }

        let header = sqlx::query(
            r#"
            INSERT INTO prescriptions (patient_id, doctor_id, medical_record_id,
                                       prescription_date, instructions, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(input.patient_id)
        .bind(input.doctor_id)
        .bind(input.medical_record_id)
        .bind(now)
        .bind(&input.instructions)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let prescription_id = header.last_insert_rowid();

        for item in &input.items {
            sqlx::query(
                r#"
                INSERT INTO prescription_items (prescription_id, medicine_id, quantity,
                                                dosage_instructions, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(prescription_id)
            .bind(item.medicine_id)
            .bind(item.quantity)
            .bind(&item.dosage_instructions)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(prescription_id, items = input.items.len(), "Prescription created");

        Ok(Prescription {
            id: prescription_id,
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            medical_record_id: input.medical_record_id,
            prescription_date: now,
            instructions: input.instructions.clone(),
            created_at: now,
        })
    }

    /// Lists all prescriptions, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Prescription>> {
        let sql = format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions ORDER BY prescription_date DESC"
        );
        let prescriptions = sqlx::query_as::<_, Prescription>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(prescriptions)
    }

    /// Gets the medicine lines of a prescription.
    pub async fn items(&self, prescription_id: i64) -> DbResult<Vec<PrescriptionItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM prescription_items WHERE prescription_id = ?1 ORDER BY id"
        );
        let items = sqlx::query_as::<_, PrescriptionItem>(&sql)
            .bind(prescription_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use klinika_core::{
        CreateMedicineInput, CreatePatientInput, CreatePrescriptionItemInput, CreateUserInput,
        Money, UserRole,
    };

    async fn seed(db: &Database) -> (i64, i64, i64) {
        let now = Utc::now();
        let patient = db
            .patients()
            .create(
                &CreatePatientInput {
                    patient_code: "P-0001".to_string(),
                    full_name: "Ayu Lestari".to_string(),
                    date_of_birth: None,
                    gender: None,
                    phone: None,
                    email: None,
                    address: None,
                    emergency_contact_name: None,
                    emergency_contact_phone: None,
                    blood_type: None,
                    allergies: None,
                    past_medical_history: None,
                },
                now,
            )
            .await
            .unwrap();
        let doctor = db
            .users()
            .create(
                &CreateUserInput {
                    username: "drsari".to_string(),
                    email: "sari@klinika.example".to_string(),
                    password: "secret123".to_string(),
                    full_name: "Dr. Sari".to_string(),
                    role: UserRole::Doctor,
                    is_active: None,
                },
                "hash",
                now,
            )
            .await
            .unwrap();
        let medicine = db
            .medicines()
            .create(
                &CreateMedicineInput {
                    name: "Paracetamol".to_string(),
                    description: None,
                    dosage_form: Some("tablet".to_string()),
                    strength: Some("500mg".to_string()),
                    manufacturer: None,
                    unit_price: Money::from_cents(350),
                    stock_quantity: Some(100),
                    expiry_date: None,
                },
                now,
            )
            .await
            .unwrap();
        (patient.id, doctor.id, medicine.id)
    }

    fn prescription_input(
        patient_id: i64,
        doctor_id: i64,
        medicine_id: i64,
    ) -> CreatePrescriptionInput {
        CreatePrescriptionInput {
            patient_id,
            doctor_id,
            medical_record_id: None,
            instructions: Some("after meals".to_string()),
            items: vec![CreatePrescriptionItemInput {
                medicine_id,
                quantity: 10,
                dosage_instructions: Some("3x1".to_string()),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_with_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id, medicine_id) = seed(&db).await;

        let prescription = db
            .prescriptions()
            .create(&prescription_input(patient_id, doctor_id, medicine_id), Utc::now())
            .await
            .unwrap();

        let items = db.prescriptions().items(prescription.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 10);
        assert_eq!(items[0].dosage_instructions.as_deref(), Some("3x1"));
    }

    #[tokio::test]
    async fn test_create_does_not_touch_medicine_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id, medicine_id) = seed(&db).await;

        db.prescriptions()
            .create(&prescription_input(patient_id, doctor_id, medicine_id), Utc::now())
            .await
            .unwrap();

        let medicine = db.medicines().get_by_id(medicine_id).await.unwrap().unwrap();
        assert_eq!(medicine.stock_quantity, 100);
    }

    #[tokio::test]
    async fn test_unknown_medicine_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id, medicine_id) = seed(&db).await;

        let mut input = prescription_input(patient_id, doctor_id, medicine_id);
        input.items.push(CreatePrescriptionItemInput {
            medicine_id: 404,
            quantity: 1,
            dosage_instructions: None,
        });

        let err = db
            .prescriptions()
            .create(&input, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity, .. } if entity == "Medicine"));

        assert!(db.prescriptions().list().await.unwrap().is_empty());
        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prescription_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_empty_items_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id, medicine_id) = seed(&db).await;

        let mut input = prescription_input(patient_id, doctor_id, medicine_id);
        input.items.clear();

        let err = db
            .prescriptions()
            .create(&input, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
