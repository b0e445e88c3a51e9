//! # Dashboard Repository
//!
//! Read-only aggregates for the dashboard landing page.

use chrono::{DateTime, Days, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use klinika_core::{DashboardStats, Money, PaymentStatus, RecentAppointment};

/// Repository for dashboard aggregate queries.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Computes the dashboard numbers.
    ///
    /// "Today" is the UTC calendar day containing `now`, so the handler
    /// controls the reference clock and tests are deterministic.
    pub async fn get_stats(&self, now: DateTime<Utc>) -> DbResult<DashboardStats> {
        let day_start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc();
        let day_end = day_start + Days::new(1);

        let total_patients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await?;

        let appointments_today: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM appointments \
             WHERE appointment_date >= ?1 AND appointment_date < ?2",
        )
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await?;

        let pending_bills: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM bills WHERE payment_status = ?1")
                .bind(PaymentStatus::Pending)
                .fetch_one(&self.pool)
                .await?;

        let total_revenue: Money = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM bills WHERE payment_status = ?1",
        )
        .bind(PaymentStatus::Paid)
        .fetch_one(&self.pool)
        .await?;

        let recent_appointments = sqlx::query_as::<_, RecentAppointment>(
            r#"
            SELECT a.id,
                   p.full_name AS patient_name,
                   u.full_name AS doctor_name,
                   a.appointment_date,
                   a.status
            FROM appointments a
            INNER JOIN patients p ON a.patient_id = p.id
            INNER JOIN users u ON a.doctor_id = u.id
            ORDER BY a.appointment_date DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_patients,
            appointments_today,
            pending_bills,
            total_revenue,
            recent_appointments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use klinika_core::{
        CreateAppointmentInput, CreateBillInput, CreateBillServiceInput, CreatePatientInput,
        CreatePaymentInput, CreateServiceInput, CreateUserInput, PaymentMethod, UserRole,
    };

    async fn seed_patient(db: &Database, code: &str) -> i64 {
        db.patients()
            .create(
                &CreatePatientInput {
                    patient_code: code.to_string(),
                    full_name: format!("Patient {code}"),
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
                Utc::now(),
            )
            .await
            .unwrap()
            .id
    }

    async fn seed_doctor(db: &Database) -> i64 {
        db.users()
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
                Utc::now(),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_empty_database_stats() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stats = db.dashboard().get_stats(Utc::now()).await.unwrap();

        assert_eq!(stats.total_patients, 0);
        assert_eq!(stats.appointments_today, 0);
        assert_eq!(stats.pending_bills, 0);
        assert_eq!(stats.total_revenue, Money::zero());
        assert!(stats.recent_appointments.is_empty());
    }

    #[tokio::test]
    async fn test_counts_and_revenue() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let patient_id = seed_patient(&db, "P-0001").await;
        seed_patient(&db, "P-0002").await;
        let doctor_id = seed_doctor(&db).await;

        // One appointment today, one last week
        db.appointments()
            .create(
                &CreateAppointmentInput {
                    patient_id,
                    doctor_id,
                    appointment_date: now,
                    duration_minutes: None,
                    status: None,
                    notes: None,
                },
                now,
            )
            .await
            .unwrap();
        db.appointments()
            .create(
                &CreateAppointmentInput {
                    patient_id,
                    doctor_id,
                    appointment_date: now - Days::new(7),
                    duration_minutes: None,
                    status: None,
                    notes: None,
                },
                now,
            )
            .await
            .unwrap();

        // One paid bill (revenue), one pending
        let service = db
            .services()
            .create(
                &CreateServiceInput {
                    name: "Consultation".to_string(),
                    description: None,
                    price: Money::from_cents(10000),
                    duration_minutes: None,
                    is_active: None,
                },
                now,
            )
            .await
            .unwrap();

        let paid_bill = db
            .billing()
            .create_bill(
                &CreateBillInput {
                    patient_id,
                    bill_number: "INV-0001".to_string(),
                    tax_amount: None,
                    notes: None,
                    services: vec![CreateBillServiceInput {
                        service_id: service.id,
                        quantity: 1,
                    }],
                },
                now,
            )
            .await
            .unwrap();
        db.billing()
            .create_payment(
                &CreatePaymentInput {
                    bill_id: paid_bill.id,
                    amount: Money::from_cents(10000),
                    payment_method: PaymentMethod::Cash,
                    reference_number: None,
                    notes: None,
                },
                now,
            )
            .await
            .unwrap();

        db.billing()
            .create_bill(
                &CreateBillInput {
                    patient_id,
                    bill_number: "INV-0002".to_string(),
                    tax_amount: None,
                    notes: None,
                    services: vec![CreateBillServiceInput {
                        service_id: service.id,
                        quantity: 2,
                    }],
                },
                now,
            )
            .await
            .unwrap();

        let stats = db.dashboard().get_stats(now).await.unwrap();
        assert_eq!(stats.total_patients, 2);
        assert_eq!(stats.appointments_today, 1);
        assert_eq!(stats.pending_bills, 1);
        assert_eq!(stats.total_revenue, Money::from_cents(10000));
        assert_eq!(stats.recent_appointments.len(), 2);
        assert_eq!(stats.recent_appointments[0].doctor_name, "Dr. Sari");
    }
}
