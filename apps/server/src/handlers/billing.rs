//! # Billing Commands
//!
//! Bills and payments. Totals are computed by the repository from
//! service price snapshots; settlement happens when payments cover the
//! bill.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use klinika_core::{Bill, BillService, CreateBillInput, CreatePaymentInput, Payment, UpdateBillInput};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct BillServicesQuery {
    pub bill_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub bill_id: Option<i64>,
}

pub async fn create_bill(
    State(state): State<SharedState>,
    Json(input): Json<CreateBillInput>,
) -> Result<Json<Bill>, ApiError> {
    debug!(bill_number = %input.bill_number, "create_bill command");

    let bill = state.db.billing().create_bill(&input, Utc::now()).await?;
    Ok(Json(bill))
}

pub async fn update_bill(
    State(state): State<SharedState>,
    Json(input): Json<UpdateBillInput>,
) -> Result<Json<Bill>, ApiError> {
    let bill = state.db.billing().update_bill(&input, Utc::now()).await?;
    Ok(Json(bill))
}

pub async fn get_bills(State(state): State<SharedState>) -> Result<Json<Vec<Bill>>, ApiError> {
    let bills = state.db.billing().list_bills().await?;
    Ok(Json(bills))
}

pub async fn get_bill_services(
    State(state): State<SharedState>,
    Query(query): Query<BillServicesQuery>,
) -> Result<Json<Vec<BillService>>, ApiError> {
    let services = state.db.billing().bill_services(query.bill_id).await?;
    Ok(Json(services))
}

pub async fn create_payment(
    State(state): State<SharedState>,
    Json(input): Json<CreatePaymentInput>,
) -> Result<Json<Payment>, ApiError> {
    debug!(bill_id = input.bill_id, "create_payment command");

    let payment = state.db.billing().create_payment(&input, Utc::now()).await?;
    Ok(Json(payment))
}

pub async fn get_payments(
    State(state): State<SharedState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let payments = state.db.billing().list_payments(query.bill_id).await?;
    Ok(Json(payments))
}
