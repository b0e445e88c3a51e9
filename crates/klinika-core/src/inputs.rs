//! # Input Objects
//!
//! Request payloads for every RPC operation, with their validation rules.
//!
//! Each input owns a `validate()` method that runs the field-level rules
//! from [`crate::validation`] before any storage access happens. Checks
//! that require stored state (does the patient exist, is there enough
//! stock) belong to the database layer where they can run inside the
//! same transaction as the write.
//!
//! Partial-update inputs follow the convention that `None` means
//! "leave unchanged".

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationResult;
use crate::money::Money;
use crate::types::{AppointmentStatus, Gender, PaymentMethod, PaymentStatus, UserRole};
use crate::validation::{
    validate_code, validate_email, validate_line_count, validate_name, validate_password,
    validate_payment_amount, validate_price, validate_quantity, validate_stock_quantity,
};

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    /// Plain password; hashed before it reaches storage.
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: Option<bool>,
}

impl CreateUserInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_code("username", &self.username)?;
        validate_email("email", &self.email)?;
        validate_password(&self.password)?;
        validate_name("full_name", &self.full_name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateUserInput {
    pub user_id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UpdateUserInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(username) = &self.username {
            validate_code("username", username)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        if let Some(full_name) = &self.full_name {
            validate_name("full_name", full_name)?;
        }
        Ok(())
    }
}

// =============================================================================
// Patients
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePatientInput {
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
}

impl CreatePatientInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_code("patient_code", &self.patient_code)?;
        validate_name("full_name", &self.full_name)?;
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdatePatientInput {
    pub patient_id: i64,
    pub patient_code: Option<String>,
    pub full_name: Option<String>,
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
}

impl UpdatePatientInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(code) = &self.patient_code {
            validate_code("patient_code", code)?;
        }
        if let Some(full_name) = &self.full_name {
            validate_name("full_name", full_name)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }
}

// =============================================================================
// Appointments
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateAppointmentInput {
    pub patient_id: i64,
    pub doctor_id: i64,
    #[ts(as = "String")]
    pub appointment_date: DateTime<Utc>,
    pub duration_minutes: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl CreateAppointmentInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(minutes) = self.duration_minutes {
            validate_quantity(minutes)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateAppointmentInput {
    pub appointment_id: i64,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    #[ts(as = "Option<String>")]
    pub appointment_date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl UpdateAppointmentInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(minutes) = self.duration_minutes {
            validate_quantity(minutes)?;
        }
        Ok(())
    }
}

// =============================================================================
// Medical Records
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateMedicalRecordInput {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_id: Option<i64>,
    pub diagnosis: String,
    pub symptoms: Option<String>,
    pub treatment_plan: Option<String>,
    pub notes: Option<String>,
}

impl CreateMedicalRecordInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("diagnosis", &self.diagnosis)?;
        Ok(())
    }
}

// =============================================================================
// Medicines
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateMedicineInput {
    pub name: String,
    pub description: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub manufacturer: Option<String>,
    #[ts(as = "String")]
    pub unit_price: Money,
    pub stock_quantity: Option<i64>,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

impl CreateMedicineInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_price("unit_price", self.unit_price)?;
        if let Some(stock) = self.stock_quantity {
            validate_stock_quantity(stock)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateMedicineInput {
    pub medicine_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub manufacturer: Option<String>,
    #[ts(as = "Option<String>")]
    pub unit_price: Option<Money>,
    pub stock_quantity: Option<i64>,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
}

impl UpdateMedicineInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(price) = self.unit_price {
            validate_price("unit_price", price)?;
        }
        if let Some(stock) = self.stock_quantity {
            validate_stock_quantity(stock)?;
        }
        Ok(())
    }
}

// =============================================================================
// Prescriptions
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePrescriptionItemInput {
    pub medicine_id: i64,
    pub quantity: i64,
    pub dosage_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePrescriptionInput {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medical_record_id: Option<i64>,
    pub instructions: Option<String>,
    pub items: Vec<CreatePrescriptionItemInput>,
}

impl CreatePrescriptionInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_line_count("items", self.items.len())?;
        for item in &self.items {
            validate_quantity(item.quantity)?;
        }
        Ok(())
    }
}

// =============================================================================
// Services
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateServiceInput {
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub price: Money,
    pub duration_minutes: Option<i64>,
    pub is_active: Option<bool>,
}

impl CreateServiceInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_price("price", self.price)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateServiceInput {
    pub service_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub price: Option<Money>,
    pub duration_minutes: Option<i64>,
    pub is_active: Option<bool>,
}

impl UpdateServiceInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(price) = self.price {
            validate_price("price", price)?;
        }
        Ok(())
    }
}

// =============================================================================
// Billing
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateBillServiceInput {
    pub service_id: i64,
    pub quantity: i64,
}

/// Bill totals are computed server-side from the service lines;
/// only the tax amount is caller-supplied.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateBillInput {
    pub patient_id: i64,
    pub bill_number: String,
    #[ts(as = "Option<String>")]
    pub tax_amount: Option<Money>,
    pub notes: Option<String>,
    pub services: Vec<CreateBillServiceInput>,
}

impl CreateBillInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_code("bill_number", &self.bill_number)?;
        validate_line_count("services", self.services.len())?;
        for line in &self.services {
            validate_quantity(line.quantity)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateBillInput {
    pub bill_id: i64,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePaymentInput {
    pub bill_id: i64,
    #[ts(as = "String")]
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

impl CreatePaymentInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_payment_amount(self.amount)?;
        Ok(())
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub unit_price: Money,
    pub stock_quantity: Option<i64>,
}

impl CreateProductInput {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_price("unit_price", self.unit_price)?;
        if let Some(stock) = self.stock_quantity {
            validate_stock_quantity(stock)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateProductInput {
    pub product_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub unit_price: Option<Money>,
    pub stock_quantity: Option<i64>,
}

impl UpdateProductInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(price) = self.unit_price {
            validate_price("unit_price", price)?;
        }
        if let Some(stock) = self.stock_quantity {
            validate_stock_quantity(stock)?;
        }
        Ok(())
    }
}

// =============================================================================
// Sales
// =============================================================================

/// One requested line: which product and how many.
///
/// Unit prices are deliberately absent. They are snapshotted from the
/// catalog inside the sale transaction so a stale form cannot sell at
/// yesterday's price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateSaleItemInput {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateSaleInput {
    /// Unique receipt code; generated when absent.
    pub sale_number: Option<String>,
    pub customer_name: Option<String>,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub amount_paid: Money,
    pub items: Vec<CreateSaleItemInput>,
}

impl CreateSaleInput {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(number) = &self.sale_number {
            validate_code("sale_number", number)?;
        }
        validate_payment_amount(self.amount_paid)?;
        validate_line_count("items", self.items.len())?;
        for item in &self.items {
            validate_quantity(item.quantity)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
