//! # Appointment Repository
//!
//! Scheduling operations. Creation checks that the referenced patient
//! and doctor exist so the caller gets a targeted error instead of a
//! bare foreign key failure.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use klinika_core::{Appointment, AppointmentStatus, CreateAppointmentInput, UpdateAppointmentInput};

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, appointment_date, duration_minutes, \
                                   status, notes, created_at, updated_at";

/// Default slot length when the form leaves duration blank.
const DEFAULT_DURATION_MINUTES: i64 = 30;

/// Repository for appointment database operations.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AppointmentRepository { pool }
    }

    /// Gets an appointment by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Appointment>> {
        let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1");
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(appointment)
    }

    /// Schedules an appointment.
    pub async fn create(
        &self,
        input: &CreateAppointmentInput,
        now: DateTime<Utc>,
    ) -> DbResult<Appointment> {
        input.validate()?;

        debug!(
            patient_id = input.patient_id,
            doctor_id = input.doctor_id,
            "Creating appointment"
        );

        self.ensure_patient_exists(input.patient_id).await?;
        self.ensure_doctor_exists(input.doctor_id).await?;

        let duration = input.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        let status = input.status.unwrap_or(AppointmentStatus::Scheduled);

        let result = sqlx::query(
            r#"
            INSERT INTO appointments (
                patient_id, doctor_id, appointment_date, duration_minutes,
                status, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(input.patient_id)
        .bind(input.doctor_id)
        .bind(input.appointment_date)
        .bind(duration)
        .bind(status)
        .bind(&input.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Appointment {
            id: result.last_insert_rowid(),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            appointment_date: input.appointment_date,
            duration_minutes: duration,
            status,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update (reschedule, status change, notes).
    pub async fn update(
        &self,
        input: &UpdateAppointmentInput,
        now: DateTime<Utc>,
    ) -> DbResult<Appointment> {
        input.validate()?;

        let mut appointment = self
            .get_by_id(input.appointment_id)
            .await?
            .ok_or_else(|| DbError::not_found("Appointment", input.appointment_id))?;

        if let Some(patient_id) = input.patient_id {
            self.ensure_patient_exists(patient_id).await?;
            appointment.patient_id = patient_id;
        }
        if let Some(doctor_id) = input.doctor_id {
            self.ensure_doctor_exists(doctor_id).await?;
            appointment.doctor_id = doctor_id;
        }
        if let Some(date) = input.appointment_date {
            appointment.appointment_date = date;
        }
        if let Some(duration) = input.duration_minutes {
            appointment.duration_minutes = duration;
        }
        if let Some(status) = input.status {
            appointment.status = status;
        }
        if input.notes.is_some() {
            appointment.notes = input.notes.clone();
        }
        appointment.updated_at = now;

        sqlx::query(
            r#"
            UPDATE appointments SET
                patient_id = ?2, doctor_id = ?3, appointment_date = ?4,
                duration_minutes = ?5, status = ?6, notes = ?7, updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(appointment.appointment_date)
        .bind(appointment.duration_minutes)
        .bind(appointment.status)
        .bind(&appointment.notes)
        .bind(appointment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Lists all appointments, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Appointment>> {
        let sql = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY appointment_date DESC"
        );
        let appointments = sqlx::query_as::<_, Appointment>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(appointments)
    }

    async fn ensure_patient_exists(&self, patient_id: i64) -> DbResult<()> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM patients WHERE id = ?1")
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await?;

        match found {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Patient", patient_id)),
        }
    }

    async fn ensure_doctor_exists(&self, doctor_id: i64) -> DbResult<()> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?1")
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await?;

        match found {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Doctor", doctor_id)),
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

    fn appointment_input(patient_id: i64, doctor_id: i64) -> CreateAppointmentInput {
        CreateAppointmentInput {
            patient_id,
            doctor_id,
            appointment_date: Utc::now(),
            duration_minutes: None,
            status: None,
            notes: Some("first visit".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id) = seed(&db).await;

        let appointment = db
            .appointments()
            .create(&appointment_input(patient_id, doctor_id), Utc::now())
            .await
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.duration_minutes, DEFAULT_DURATION_MINUTES);
    }

    #[tokio::test]
    async fn test_create_unknown_patient() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (_, doctor_id) = seed(&db).await;

        let err = db
            .appointments()
            .create(&appointment_input(999, doctor_id), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity, .. } if entity == "Patient"));
    }

    #[tokio::test]
    async fn test_create_unknown_doctor() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, _) = seed(&db).await;

        let err = db
            .appointments()
            .create(&appointment_input(patient_id, 999), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity, .. } if entity == "Doctor"));
    }

    #[tokio::test]
    async fn test_status_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (patient_id, doctor_id) = seed(&db).await;

        let appointment = db
            .appointments()
            .create(&appointment_input(patient_id, doctor_id), Utc::now())
            .await
            .unwrap();

        let updated = db
            .appointments()
            .update(
                &UpdateAppointmentInput {
                    appointment_id: appointment.id,
                    patient_id: None,
                    doctor_id: None,
                    appointment_date: None,
                    duration_minutes: None,
                    status: Some(AppointmentStatus::Completed),
                    notes: None,
                },
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(updated.status, AppointmentStatus::Completed);
        assert_eq!(updated.notes.as_deref(), Some("first visit"));
    }
}
