//! # Sale Commands
//!
//! The point-of-sale surface. `create_sale` hands the request to the
//! transactional processor in klinika-db; everything commits or nothing
//! does.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use klinika_core::{CreateSaleInput, Sale, SaleItem};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SaleItemsQuery {
    pub sale_id: i64,
}

pub async fn create_sale(
    State(state): State<SharedState>,
    Json(input): Json<CreateSaleInput>,
) -> Result<Json<Sale>, ApiError> {
    debug!(items = input.items.len(), "create_sale command");

    let sale = state.db.sales().create(&input, Utc::now()).await?;

    info!(
        sale_id = sale.id,
        sale_number = %sale.sale_number,
        total = %sale.total_amount,
        "Sale created"
    );

    Ok(Json(sale))
}

pub async fn get_sales(State(state): State<SharedState>) -> Result<Json<Vec<Sale>>, ApiError> {
    let sales = state.db.sales().list().await?;
    Ok(Json(sales))
}

pub async fn get_sale_items(
    State(state): State<SharedState>,
    Query(query): Query<SaleItemsQuery>,
) -> Result<Json<Vec<SaleItem>>, ApiError> {
    let items = state.db.sales().items(query.sale_id).await?;
    Ok(Json(items))
}
