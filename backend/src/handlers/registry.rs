//! HTTP handlers for the registry endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::external::MailerClient;
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::notification::NotificationService;
use crate::services::registry::{
    CustomerInput, RegistryService, RepresentativeInput, SupplierInput,
};
use crate::AppState;
use shared::{Customer, Representative, Supplier};

fn registry_service(state: &AppState) -> RegistryService {
    let mailer = MailerClient::from_config(&state.config.mail);
    let notifications = NotificationService::new(state.db.clone(), mailer);
    RegistryService::new(state.db.clone(), notifications)
}

// ============================================================================
// Customers
// ============================================================================

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CustomerInput>,
) -> AppResult<Json<Customer>> {
    require(&current_user.0, "registry", "create")?;
    let customer = registry_service(&state)
        .create_customer(current_user.0.user_id, input)
        .await?;
    Ok(Json(customer))
}

/// List customers
pub async fn list_customers(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Customer>>> {
    require(&current_user.0, "registry", "view")?;
    let customers = registry_service(&state).list_customers().await?;
    Ok(Json(customers))
}

/// Get a customer
pub async fn get_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    require(&current_user.0, "registry", "view")?;
    let customer = registry_service(&state).get_customer(customer_id).await?;
    Ok(Json(customer))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> AppResult<Json<Customer>> {
    require(&current_user.0, "registry", "edit")?;
    let customer = registry_service(&state)
        .update_customer(customer_id, input)
        .await?;
    Ok(Json(customer))
}

/// Deactivate a customer
pub async fn deactivate_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require(&current_user.0, "registry", "delete")?;
    registry_service(&state)
        .deactivate_customer(customer_id)
        .await?;
    Ok(Json(()))
}

// ============================================================================
// Suppliers
// ============================================================================

/// Create a supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    require(&current_user.0, "registry", "create")?;
    let supplier = registry_service(&state).create_supplier(input).await?;
    Ok(Json(supplier))
}

/// List suppliers
pub async fn list_suppliers(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Supplier>>> {
    require(&current_user.0, "registry", "view")?;
    let suppliers = registry_service(&state).list_suppliers().await?;
    Ok(Json(suppliers))
}

/// Get a supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    require(&current_user.0, "registry", "view")?;
    let supplier = registry_service(&state).get_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    require(&current_user.0, "registry", "edit")?;
    let supplier = registry_service(&state)
        .update_supplier(supplier_id, input)
        .await?;
    Ok(Json(supplier))
}

/// Deactivate a supplier
pub async fn deactivate_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require(&current_user.0, "registry", "delete")?;
    registry_service(&state)
        .deactivate_supplier(supplier_id)
        .await?;
    Ok(Json(()))
}

// ============================================================================
// Representatives
// ============================================================================

/// Create a representative
pub async fn create_representative(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RepresentativeInput>,
) -> AppResult<Json<Representative>> {
    require(&current_user.0, "registry", "create")?;
    let rep = registry_service(&state)
        .create_representative(current_user.0.user_id, input)
        .await?;
    Ok(Json(rep))
}

/// List representatives
pub async fn list_representatives(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Representative>>> {
    require(&current_user.0, "registry", "view")?;
    let reps = registry_service(&state).list_representatives().await?;
    Ok(Json(reps))
}
