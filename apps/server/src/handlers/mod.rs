//! # RPC Handlers
//!
//! One module per domain area, one async fn per operation. Handlers are
//! deliberately thin: stamp the request time, call the repository, wrap
//! the result. All business decisions live below this layer.
//!
//! Routes are flat RPC names under `/rpc/`, mirroring the operation
//! names the frontend invokes (`create_sale`, `get_sales`, ...).

pub mod appointment;
pub mod billing;
pub mod dashboard;
pub mod medical_record;
pub mod medicine;
pub mod patient;
pub mod prescription;
pub mod product;
pub mod sale;
pub mod service;
pub mod user;

use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::state::SharedState;

/// Builds the full application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        // Health check
        .route("/rpc/healthcheck", get(healthcheck))
        // User management
        .route("/rpc/create_user", post(user::create_user))
        .route("/rpc/update_user", post(user::update_user))
        .route("/rpc/get_users", get(user::get_users))
        // Patient management
        .route("/rpc/create_patient", post(patient::create_patient))
        .route("/rpc/update_patient", post(patient::update_patient))
        .route("/rpc/get_patients", get(patient::get_patients))
        // Appointment management
        .route("/rpc/create_appointment", post(appointment::create_appointment))
        .route("/rpc/update_appointment", post(appointment::update_appointment))
        .route("/rpc/get_appointments", get(appointment::get_appointments))
        // Medical record management
        .route(
            "/rpc/create_medical_record",
            post(medical_record::create_medical_record),
        )
        .route(
            "/rpc/get_medical_records",
            get(medical_record::get_medical_records),
        )
        // Medicine management
        .route("/rpc/create_medicine", post(medicine::create_medicine))
        .route("/rpc/update_medicine", post(medicine::update_medicine))
        .route("/rpc/get_medicines", get(medicine::get_medicines))
        // Prescription management
        .route(
            "/rpc/create_prescription",
            post(prescription::create_prescription),
        )
        .route("/rpc/get_prescriptions", get(prescription::get_prescriptions))
        .route(
            "/rpc/get_prescription_items",
            get(prescription::get_prescription_items),
        )
        // Service management
        .route("/rpc/create_service", post(service::create_service))
        .route("/rpc/update_service", post(service::update_service))
        .route("/rpc/get_services", get(service::get_services))
        // Bill management
        .route("/rpc/create_bill", post(billing::create_bill))
        .route("/rpc/update_bill", post(billing::update_bill))
        .route("/rpc/get_bills", get(billing::get_bills))
        .route("/rpc/get_bill_services", get(billing::get_bill_services))
        // Payment management
        .route("/rpc/create_payment", post(billing::create_payment))
        .route("/rpc/get_payments", get(billing::get_payments))
        // Non-medical product management
        .route(
            "/rpc/create_non_medical_product",
            post(product::create_non_medical_product),
        )
        .route(
            "/rpc/update_non_medical_product",
            post(product::update_non_medical_product),
        )
        .route(
            "/rpc/get_non_medical_products",
            get(product::get_non_medical_products),
        )
        // Sales management
        .route("/rpc/create_sale", post(sale::create_sale))
        .route("/rpc/get_sales", get(sale::get_sales))
        .route("/rpc/get_sale_items", get(sale::get_sale_items))
        // Dashboard
        .route("/rpc/get_dashboard_stats", get(dashboard::get_dashboard_stats))
        // The form frontend is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthcheckResponse {
    status: &'static str,
    timestamp: String,
}

async fn healthcheck() -> Json<HealthcheckResponse> {
    Json(HealthcheckResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}
