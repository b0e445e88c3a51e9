//! # Non-Medical Product Commands

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use klinika_core::{CreateProductInput, Product, UpdateProductInput};

use crate::error::ApiError;
use crate::state::SharedState;

pub async fn create_non_medical_product(
    State(state): State<SharedState>,
    Json(input): Json<CreateProductInput>,
) -> Result<Json<Product>, ApiError> {
    let product = state.db.products().create(&input, Utc::now()).await?;
    Ok(Json(product))
}

pub async fn update_non_medical_product(
    State(state): State<SharedState>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, ApiError> {
    let product = state.db.products().update(&input, Utc::now()).await?;
    Ok(Json(product))
}

pub async fn get_non_medical_products(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}
