//! HTTP handlers for the product catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::product::{CategoryInput, ProductInput, ProductService};
use crate::AppState;
use shared::{Category, Product};

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    require(&current_user.0, "product", "create")?;
    let service = ProductService::new(state.db);
    let category = service.create_category(input).await?;
    Ok(Json(category))
}

/// List categories
pub async fn list_categories(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    require(&current_user.0, "product", "view")?;
    let service = ProductService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    require(&current_user.0, "product", "create")?;
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok(Json(product))
}

/// List products
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    require(&current_user.0, "product", "view")?;
    let service = ProductService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    require(&current_user.0, "product", "view")?;
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    require(&current_user.0, "product", "edit")?;
    let service = ProductService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// Deactivate a product
pub async fn deactivate_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require(&current_user.0, "product", "delete")?;
    let service = ProductService::new(state.db);
    service.deactivate_product(product_id).await?;
    Ok(Json(()))
}
