//! # Medical Record Repository

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use klinika_core::{CreateMedicalRecordInput, MedicalRecord};

const RECORD_COLUMNS: &str = "id, patient_id, doctor_id, appointment_id, diagnosis, symptoms, \
                              treatment_plan, notes, created_at";

/// Repository for medical record database operations.
#[derive(Debug, Clone)]
pub struct MedicalRecordRepository {
    pool: SqlitePool,
}

impl MedicalRecordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MedicalRecordRepository { pool }
    }

    /// Files a medical record for a visit.
    pub async fn create(
        &self,
        input: &CreateMedicalRecordInput,
        now: DateTime<Utc>,
    ) -> DbResult<MedicalRecord> {
        input.validate()?;

        debug!(patient_id = input.patient_id, "Creating medical record");

        self.ensure_exists("patients", "Patient", input.patient_id)
            .await?;
        self.ensure_exists("users", "Doctor", input.doctor_id)
            .await?;
        if let Some(appointment_id) = input.appointment_id {
            self.ensure_exists("appointments", "Appointment", appointment_id)
                .await?;
        }

        let result = sqlx::query(
            r#"
            INSERT INTO medical_records (
                patient_id, doctor_id, appointment_id, diagnosis, symptoms,
                treatment_plan, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(input.patient_id)
        .bind(input.doctor_id)
        .bind(input.appointment_id)
        .bind(&input.diagnosis)
        .bind(&input.symptoms)
        .bind(&input.treatment_plan)
        .bind(&input.notes)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(MedicalRecord {
            id: result.last_insert_rowid(),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            appointment_id: input.appointment_id,
            diagnosis: input.diagnosis.clone(),
            symptoms: input.symptoms.clone(),
            treatment_plan: input.treatment_plan.clone(),
            notes: input.notes.clone(),
            created_at: now,
        })
    }

    /// Lists medical records, optionally scoped to one patient.
    pub async fn list(&self, patient_id: Option<i64>) -> DbResult<Vec<MedicalRecord>> {
        let records = match patient_id {
            Some(patient_id) => {
                let sql = format!(
                    "SELECT {RECORD_COLUMNS} FROM medical_records \
                     WHERE patient_id = ?1 ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, MedicalRecord>(&sql)
                    .bind(patient_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql =
                    format!("SELECT {RECORD_COLUMNS} FROM medical_records ORDER BY created_at DESC");
                sqlx::query_as::<_, MedicalRecord>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(records)
    }

    async fn ensure_exists(&self, table: &str, entity: &str, id: i64) -> DbResult<()> {
        let sql = format!("SELECT id FROM {table} WHERE id = ?1");
        let found: Option<i64> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match found {
            Some(_) => Ok(()),
            None => Err(DbError::not_found(entity, id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use klinika_core::{CreatePatientInput, CreateUserInput, UserRole};

    async fn seed(db: &Database) -> (i64, i64) {
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
        (patient.id, doctor.id)
    }

    fn record_input(patient_id: i64, doctor_id: i64) -> CreateMedicalRecordInput {
        CreateMedicalRecordInput {
            patient_id,
            doctor_id,
            appointment_id: None,
            diagnosis: "Acute pharyngitis".to_string(),
            symptoms: Some("sore throat, fever".to_string()),
            treatment_plan: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_filter_by_patient() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id) = seed(&db).await;

        db.medical_records()
            .create(&record_input(patient_id, doctor_id), Utc::now())
            .await
            .unwrap();

        let all = db.medical_records().list(None).await.unwrap();
        assert_eq!(all.len(), 1);

        let for_patient = db.medical_records().list(Some(patient_id)).await.unwrap();
        assert_eq!(for_patient.len(), 1);

        let for_other = db.medical_records().list(Some(patient_id + 1)).await.unwrap();
        assert!(for_other.is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_appointment() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id) = seed(&db).await;

        let mut input = record_input(patient_id, doctor_id);
        input.appointment_id = Some(42);

        let err = db
            .medical_records()
            .create(&input, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity, .. } if entity == "Appointment"));
    }
}
