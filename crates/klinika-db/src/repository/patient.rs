//! # Patient Repository

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use klinika_core::{CreatePatientInput, Patient, UpdatePatientInput};

const PATIENT_COLUMNS: &str = "id, patient_code, full_name, date_of_birth, gender, phone, email, \
                               address, emergency_contact_name, emergency_contact_phone, \
                               blood_type, allergies, past_medical_history, created_at, updated_at";

/// Repository for patient database operations.
#[derive(Debug, Clone)]
pub struct PatientRepository {
    pool: SqlitePool,
}

impl PatientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PatientRepository { pool }
    }

    /// Gets a patient by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Patient>> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1");
        let patient = sqlx::query_as::<_, Patient>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(patient)
    }

    /// Registers a new patient.
    ///
    /// Duplicate `patient_code` surfaces as [`DbError::UniqueViolation`].
    pub async fn create(&self, input: &CreatePatientInput, now: DateTime<Utc>) -> DbResult<Patient> {
        input.validate()?;

        debug!(patient_code = %input.patient_code, "Creating patient");

        let result = sqlx::query(
            r#"
            INSERT INTO patients (
                patient_code, full_name, date_of_birth, gender, phone, email,
                address, emergency_contact_name, emergency_contact_phone,
                blood_type, allergies, past_medical_history,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&input.patient_code)
        .bind(&input.full_name)
        .bind(input.date_of_birth)
        .bind(input.gender)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.emergency_contact_name)
        .bind(&input.emergency_contact_phone)
        .bind(&input.blood_type)
        .bind(&input.allergies)
        .bind(&input.past_medical_history)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Patient {
            id: result.last_insert_rowid(),
            patient_code: input.patient_code.clone(),
            full_name: input.full_name.clone(),
            date_of_birth: input.date_of_birth,
            gender: input.gender,
            phone: input.phone.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            emergency_contact_name: input.emergency_contact_name.clone(),
            emergency_contact_phone: input.emergency_contact_phone.clone(),
            blood_type: input.blood_type.clone(),
            allergies: input.allergies.clone(),
            past_medical_history: input.past_medical_history.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update to a patient record.
    pub async fn update(&self, input: &UpdatePatientInput, now: DateTime<Utc>) -> DbResult<Patient> {
        input.validate()?;

        let mut patient = self
            .get_by_id(input.patient_id)
            .await?
            .ok_or_else(|| DbError::not_found("Patient", input.patient_id))?;

        if let Some(code) = &input.patient_code {
            patient.patient_code = code.clone();
        }
        if let Some(full_name) = &input.full_name {
            patient.full_name = full_name.clone();
        }
        if input.date_of_birth.is_some() {
            patient.date_of_birth = input.date_of_birth;
        }
        if input.gender.is_some() {
            patient.gender = input.gender;
        }
        if input.phone.is_some() {
            patient.phone = input.phone.clone();
        }
        if input.email.is_some() {
            patient.email = input.email.clone();
        }
        if input.address.is_some() {
            patient.address = input.address.clone();
        }
        if input.emergency_contact_name.is_some() {
            patient.emergency_contact_name = input.emergency_contact_name.clone();
        }
        if input.emergency_contact_phone.is_some() {
            patient.emergency_contact_phone = input.emergency_contact_phone.clone();
        }
        if input.blood_type.is_some() {
            patient.blood_type = input.blood_type.clone();
        }
        if input.allergies.is_some() {
            patient.allergies = input.allergies.clone();
        }
        if input.past_medical_history.is_some() {
            patient.past_medical_history = input.past_medical_history.clone();
        }
        patient.updated_at = now;

        sqlx::query(
            r#"
            UPDATE patients SET
                patient_code = ?2, full_name = ?3, date_of_birth = ?4, gender = ?5,
                phone = ?6, email = ?7, address = ?8,
                emergency_contact_name = ?9, emergency_contact_phone = ?10,
                blood_type = ?11, allergies = ?12, past_medical_history = ?13,
                updated_at = ?14
            WHERE id = ?1
            "#,
        )
        .bind(patient.id)
        .bind(&patient.patient_code)
        .bind(&patient.full_name)
        .bind(patient.date_of_birth)
        .bind(patient.gender)
        .bind(&patient.phone)
        .bind(&patient.email)
        .bind(&patient.address)
        .bind(&patient.emergency_contact_name)
        .bind(&patient.emergency_contact_phone)
        .bind(&patient.blood_type)
        .bind(&patient.allergies)
        .bind(&patient.past_medical_history)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(patient)
    }

    /// Lists all patients.
    pub async fn list(&self) -> DbResult<Vec<Patient>> {
        let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id");
        let patients = sqlx::query_as::<_, Patient>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(patients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn patient_input(code: &str) -> CreatePatientInput {
        CreatePatientInput {
            patient_code: code.to_string(),
            full_name: "Ayu Lestari".to_string(),
            date_of_birth: None,
            gender: None,
            phone: Some("0812-000-111".to_string()),
            email: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            blood_type: None,
            allergies: None,
            past_medical_history: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let patient = db
            .patients()
            .create(&patient_input("P-0001"), now)
            .await
            .unwrap();
        assert_eq!(patient.patient_code, "P-0001");

        let fetched = db.patients().get_by_id(patient.id).await.unwrap().unwrap();
        assert_eq!(fetched.full_name, "Ayu Lestari");
        assert_eq!(fetched.phone.as_deref(), Some("0812-000-111"));
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        db.patients()
            .create(&patient_input("P-0001"), now)
            .await
            .unwrap();
        let err = db
            .patients()
            .create(&patient_input("P-0001"), now)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let patient = db
            .patients()
            .create(&patient_input("P-0001"), now)
            .await
            .unwrap();

        let updated = db
            .patients()
            .update(
                &UpdatePatientInput {
                    patient_id: patient.id,
                    patient_code: None,
                    full_name: None,
                    date_of_birth: None,
                    gender: None,
                    phone: None,
                    email: None,
                    address: Some("Jl. Melati 5".to_string()),
                    emergency_contact_name: None,
                    emergency_contact_phone: None,
                    blood_type: Some("O".to_string()),
                    allergies: None,
                    past_medical_history: None,
                },
                now,
            )
            .await
            .unwrap();

        assert_eq!(updated.address.as_deref(), Some("Jl. Melati 5"));
        assert_eq!(updated.blood_type.as_deref(), Some("O"));
        assert_eq!(updated.patient_code, "P-0001");
        assert_eq!(updated.phone.as_deref(), Some("0812-000-111"));
    }
}
