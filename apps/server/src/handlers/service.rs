//! # Service Commands

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use klinika_core::{CreateServiceInput, Service, UpdateServiceInput};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn create_service(
    State(state): State<SharedState>,
    Json(input): Json<CreateServiceInput>,
) -> Result<Json<Service>, ApiError> {
    let service = state.db.services().create(&input, Utc::now()).await?;
    Ok(Json(service))
}

pub async fn update_service(
    State(state): State<SharedState>,
    Json(input): Json<UpdateServiceInput>,
) -> Result<Json<Service>, ApiError> {
    let service = state.db.services().update(&input, Utc::now()).await?;
    Ok(Json(service))
}

pub async fn get_services(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let services = state.db.services().list().await?;
    Ok(Json(services))
}
