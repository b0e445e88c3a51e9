//! # Dashboard Commands

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use klinika_core::DashboardStats;

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn get_dashboard_stats(
    State(state): State<SharedState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state.db.dashboard().get_stats(Utc::now()).await?;
    Ok(Json(stats))
}
