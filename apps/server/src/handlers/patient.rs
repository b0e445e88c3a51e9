//! # Patient Commands

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use klinika_core::{CreatePatientInput, Patient, UpdatePatientInput};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn create_patient(
    State(state): State<SharedState>,
    Json(input): Json<CreatePatientInput>,
) -> Result<Json<Patient>, ApiError> {
    let patient = state.db.patients().create(&input, Utc::now()).await?;
    Ok(Json(patient))
}

pub async fn update_patient(
    State(state): State<SharedState>,
    Json(input): Json<UpdatePatientInput>,
) -> Result<Json<Patient>, ApiError> {
    let patient = state.db.patients().update(&input, Utc::now()).await?;
    Ok(Json(patient))
}

pub async fn get_patients(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state.db.patients().list().await?;
    Ok(Json(patients))
}
