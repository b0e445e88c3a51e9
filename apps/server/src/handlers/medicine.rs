//! # Medicine Commands

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use klinika_core::{CreateMedicineInput, Medicine, UpdateMedicineInput};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn create_medicine(
    State(state): State<SharedState>,
    Json(input): Json<CreateMedicineInput>,
) -> Result<Json<Medicine>, ApiError> {
    let medicine = state.db.medicines().create(&input, Utc::now()).await?;
    Ok(Json(medicine))
}

pub async fn update_medicine(
    State(state): State<SharedState>,
    Json(input): Json<UpdateMedicineInput>,
) -> Result<Json<Medicine>, ApiError> {
    let medicine = state.db.medicines().update(&input, Utc::now()).await?;
    Ok(Json(medicine))
}

pub async fn get_medicines(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Medicine>>, ApiError> {
    let medicines = state.db.medicines().list().await?;
    Ok(Json(medicines))
}
