//! HTTP handlers for warehouse inventory endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::inventory::{InventoryService, LotWithProduct, ProductStock};
use crate::AppState;
use shared::InventoryLot;

/// Query parameters for expiry windows
#[derive(Debug, Deserialize)]
pub struct ExpiryParams {
    pub days: Option<i64>,
}

/// List lots with stock on hand
pub async fn list_lots(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<LotWithProduct>>> {
    require(&current_user.0, "inventory", "view")?;
    let service = InventoryService::new(state.db);
    let lots = service.list_lots().await?;
    Ok(Json(lots))
}

/// Get a lot
pub async fn get_lot(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<InventoryLot>> {
    require(&current_user.0, "inventory", "view")?;
    let service = InventoryService::new(state.db);
    let lot = service.get_lot(lot_id).await?;
    Ok(Json(lot))
}

/// List lots expiring within a window (default 30 days)
pub async fn list_expiring_lots(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ExpiryParams>,
) -> AppResult<Json<Vec<LotWithProduct>>> {
    require(&current_user.0, "inventory", "view")?;
    let service = InventoryService::new(state.db);
    let lots = service.list_expiring_lots(params.days).await?;
    Ok(Json(lots))
}

/// List expired lots with stock remaining
pub async fn list_expired_lots(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<LotWithProduct>>> {
    require(&current_user.0, "inventory", "view")?;
    let service = InventoryService::new(state.db);
    let lots = service.list_expired_lots().await?;
    Ok(Json(lots))
}

/// List products at or below their minimum stock threshold
pub async fn list_low_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductStock>>> {
    require(&current_user.0, "inventory", "view")?;
    let service = InventoryService::new(state.db);
    let products = service.list_low_stock().await?;
    Ok(Json(products))
}

/// On-hand totals per product
pub async fn stock_summary(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductStock>>> {
    require(&current_user.0, "inventory", "view")?;
    let service = InventoryService::new(state.db);
    let summary = service.stock_summary().await?;
    Ok(Json(summary))
}
