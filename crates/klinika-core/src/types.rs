//! # Domain Types
//!
//! Core domain types for the clinic backend.
//!
//! ## Type Hierarchy
//! ```text
//! Clinical side                      Point-of-sale side
//! ─────────────                      ──────────────────
//! Patient ── Appointment             Product (catalog + stock)
//!    │           │                      │
//!    │       MedicalRecord           Sale ── SaleItem (price snapshot)
//!    │           │
//!    │       Prescription ── PrescriptionItem
//!    │
//!    └── Bill ── BillService (price snapshot)
//!            │
//!         Payment
//! ```
//!
//! ## Identity Pattern
//! Every entity has an `id` (database row id, immutable) and, where a
//! human reads it off a form or receipt, a UNIQUE business code
//! (`patient_code`, `bill_number`, `sale_number`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Enums
// =============================================================================

/// Staff role. There is no login flow; the role drives form visibility
/// in the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Doctor,
    Nurse,
    Receptionist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Lifecycle of an appointment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

/// Settlement state of a bill.
///
/// `Paid` is derived: the billing recorder flips it once recorded
/// payments cover the bill total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Insurance,
    MobileMoney,
}

// =============================================================================
// Staff & Patients
// =============================================================================

/// A staff account (doctor, nurse, receptionist, admin).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 hash. Never a plain password.
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Patient {
    pub id: i64,
    /// Human-readable registration code, unique per clinic.
    pub patient_code: String,
    pub full_name: String,
    #[ts(as = "Option<String>")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
    pub past_medical_history: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Appointments & Records
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    /// References a user with the doctor role.
    pub doctor_id: i64,
    #[ts(as = "String")]
    pub appointment_date: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_id: Option<i64>,
    pub diagnosis: String,
    pub symptoms: Option<String>,
    pub treatment_plan: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Pharmacy
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub manufacturer: Option<String>,
    #[ts(as = "String")]
    pub unit_price: Money,
    pub stock_quantity: i64,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medical_record_id: Option<i64>,
    #[ts(as = "String")]
    pub prescription_date: DateTime<Utc>,
    pub instructions: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One medicine line on a prescription. Created atomically with its
/// parent and never updated independently.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PrescriptionItem {
    pub id: i64,
    pub prescription_id: i64,
    pub medicine_id: i64,
    pub quantity: i64,
    pub dosage_instructions: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Billing
// =============================================================================

/// A clinical service that can appear on a bill.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub price: Money,
    pub duration_minutes: Option<i64>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A charge record for clinical services rendered to a patient.
///
/// `subtotal` is computed from the service lines at creation time;
/// `total_amount = subtotal + tax_amount`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    pub id: i64,
    pub patient_id: i64,
    pub bill_number: String,
    #[ts(as = "String")]
    pub bill_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub subtotal: Money,
    #[ts(as = "String")]
    pub tax_amount: Money,
    #[ts(as = "String")]
    pub total_amount: Money,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// One service line on a bill.
/// `unit_price` is a snapshot of the service price at billing time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillService {
    pub id: i64,
    pub bill_id: i64,
    pub service_id: i64,
    pub quantity: i64,
    #[ts(as = "String")]
    pub unit_price: Money,
    #[ts(as = "String")]
    pub total_price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A payment recorded against a bill. A bill may accumulate several
/// partial payments before it is settled.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: i64,
    pub bill_id: i64,
    #[ts(as = "String")]
    pub amount: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub payment_date: DateTime<Utc>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Point of Sale
// =============================================================================

/// A sellable non-medical item (catalog entry with stock).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub unit_price: Money,
    /// Units on hand. Never negative; sales decrement it atomically.
    pub stock_quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A completed point-of-sale transaction for non-medical products.
///
/// Sales are immutable after creation. Invariants, enforced at
/// creation time inside one transaction:
/// - `total_amount` equals the sum of the line items' `total_price`
/// - `change_amount = max(0, amount_paid - total_amount)`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub sale_number: String,
    pub customer_name: Option<String>,
    #[ts(as = "String")]
    pub total_amount: Money,
    #[ts(as = "String")]
    pub amount_paid: Money,
    #[ts(as = "String")]
    pub change_amount: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One line within a sale.
///
/// Uses the snapshot pattern: `unit_price` is the product's price at
/// sale time, frozen so later catalog changes don't rewrite history.
/// `total_price = quantity * unit_price`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    #[ts(as = "String")]
    pub unit_price: Money,
    #[ts(as = "String")]
    pub total_price: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// A recent appointment joined with patient and doctor names.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecentAppointment {
    pub id: i64,
    pub patient_name: String,
    pub doctor_name: String,
    #[ts(as = "String")]
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Aggregated numbers for the dashboard landing page.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_patients: i64,
    pub appointments_today: i64,
    pub pending_bills: i64,
    /// Sum of `total_amount` over paid bills.
    #[ts(as = "String")]
    pub total_revenue: Money,
    pub recent_appointments: Vec<RecentAppointment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::MobileMoney).unwrap(),
            "\"mobile_money\""
        );
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::NoShow).unwrap(),
            "\"no_show\""
        );
        let status: PaymentStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, PaymentStatus::Pending);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Scheduled);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }
}
