//! # Appointment Commands

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use klinika_core::{Appointment, CreateAppointmentInput, UpdateAppointmentInput};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn create_appointment(
    State(state): State<SharedState>,
    Json(input): Json<CreateAppointmentInput>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = state.db.appointments().create(&input, Utc::now()).await?;
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<SharedState>,
    Json(input): Json<UpdateAppointmentInput>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = state.db.appointments().update(&input, Utc::now()).await?;
    Ok(Json(appointment))
}

pub async fn get_appointments(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = state.db.appointments().list().await?;
    Ok(Json(appointments))
}
