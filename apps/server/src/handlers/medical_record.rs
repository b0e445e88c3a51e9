//! # Medical Record Commands

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use klinika_core::{CreateMedicalRecordInput, MedicalRecord};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct MedicalRecordListQuery {
    pub patient_id: Option<i64>,
}

pub async fn create_medical_record(
    State(state): State<SharedState>,
    Json(input): Json<CreateMedicalRecordInput>,
) -> Result<Json<MedicalRecord>, ApiError> {
    let record = state.db.medical_records().create(&input, Utc::now()).await?;
    Ok(Json(record))
}

pub async fn get_medical_records(
    State(state): State<SharedState>,
    Query(query): Query<MedicalRecordListQuery>,
) -> Result<Json<Vec<MedicalRecord>>, ApiError> {
    let records = state.db.medical_records().list(query.patient_id).await?;
    Ok(Json(records))
}
