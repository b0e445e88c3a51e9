//! # Prescription Commands

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use klinika_core::{CreatePrescriptionInput, Prescription, PrescriptionItem};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct PrescriptionItemsQuery {
    pub prescription_id: i64,
}

pub async fn create_prescription(
    State(state): State<SharedState>,
    Json(input): Json<CreatePrescriptionInput>,
) -> Result<Json<Prescription>, ApiError> {
    let prescription = state.db.prescriptions().create(&input, Utc::now()).await?;
    Ok(Json(prescription))
}

pub async fn get_prescriptions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Prescription>>, ApiError> {
    let prescriptions = state.db.prescriptions().list().await?;
    Ok(Json(prescriptions))
}

pub async fn get_prescription_items(
    State(state): State<SharedState>,
    Query(query): Query<PrescriptionItemsQuery>,
) -> Result<Json<Vec<PrescriptionItem>>, ApiError> {
    let items = state.db.prescriptions().items(query.prescription_id).await?;
    Ok(Json(items))
}
