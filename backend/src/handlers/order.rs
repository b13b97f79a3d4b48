//! HTTP handlers for the purchase order endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::order::{
    CreateOrderInput, OrderFilter, OrderService, UpdateOrderInput, UpdateStatusInput,
};
use crate::AppState;
use shared::Order;

/// Create an order in draft state
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<Order>> {
    require(&current_user.0, "order", "create")?;
    let service = OrderService::new(state.db);
    let order = service.create_order(current_user.0.user_id, input).await?;
    Ok(Json(order))
}

/// List orders (filterable by status, supplier, lateness)
pub async fn list_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<Vec<Order>>> {
    require(&current_user.0, "order", "view")?;
    let service = OrderService::new(state.db);
    let orders = service.list_orders(filter).await?;
    Ok(Json(orders))
}

/// List orders still waiting for goods
pub async fn list_receivable_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    require(&current_user.0, "order", "view")?;
    let service = OrderService::new(state.db);
    let orders = service.list_receivable_orders().await?;
    Ok(Json(orders))
}

/// Get an order
pub async fn get_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    require(&current_user.0, "order", "view")?;
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Edit a draft order
pub async fn update_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderInput>,
) -> AppResult<Json<Order>> {
    require(&current_user.0, "order", "edit")?;
    let service = OrderService::new(state.db);
    let order = service.update_order(order_id, input).await?;
    Ok(Json(order))
}

/// Apply a user-facing status change
pub async fn update_order_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateStatusInput>,
) -> AppResult<Json<Order>> {
    require(&current_user.0, "order", "edit")?;
    let service = OrderService::new(state.db);
    let order = service.update_status(order_id, input).await?;
    Ok(Json(order))
}

/// Cancel an order
pub async fn cancel_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    require(&current_user.0, "order", "edit")?;
    let service = OrderService::new(state.db);
    let order = service.cancel_order(order_id).await?;
    Ok(Json(order))
}
