//! HTTP handlers for goods receipt endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::receipt::{ReceiptDetail, ReceiptService, ReceiveOrderInput};
use crate::AppState;
use shared::Receipt;

/// Receive an order, reconciling the delivered goods into the warehouse
pub async fn receive_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<ReceiveOrderInput>,
) -> AppResult<Json<ReceiptDetail>> {
    require(&current_user.0, "receipt", "create")?;
    let service = ReceiptService::new(state.db);
    let detail = service
        .receive_order(order_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(detail))
}

/// Get the receipt of an order with its line items
pub async fn get_order_receipt(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ReceiptDetail>> {
    require(&current_user.0, "receipt", "view")?;
    let service = ReceiptService::new(state.db);
    let detail = service.get_receipt_for_order(order_id).await?;
    Ok(Json(detail))
}

/// List receipts
pub async fn list_receipts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Receipt>>> {
    require(&current_user.0, "receipt", "view")?;
    let service = ReceiptService::new(state.db);
    let receipts = service.list_receipts().await?;
    Ok(Json(receipts))
}
