//! HTTP handlers for fleet management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::inventory::ExpiryParams;
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::fleet::{
    CompleteMaintenanceInput, CreateDocumentInput, CreateMaintenanceInput, CreateVehicleInput,
    FleetService, RecordRefuelInput, RefuelView, UpdateVehicleInput,
};
use crate::AppState;
use shared::{FleetStatistics, FuelType, MaintenanceEvent, Vehicle, VehicleDocument};

/// Register a vehicle
pub async fn create_vehicle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateVehicleInput>,
) -> AppResult<Json<Vehicle>> {
    require(&current_user.0, "fleet", "create")?;
    let service = FleetService::new(state.db);
    let vehicle = service.create_vehicle(input).await?;
    Ok(Json(vehicle))
}

/// List vehicles
pub async fn list_vehicles(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Vehicle>>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let vehicles = service.list_vehicles().await?;
    Ok(Json(vehicles))
}

/// Get a vehicle
pub async fn get_vehicle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<Json<Vehicle>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let vehicle = service.get_vehicle(vehicle_id).await?;
    Ok(Json(vehicle))
}

/// Update a vehicle's assignment and flags
pub async fn update_vehicle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
    Json(input): Json<UpdateVehicleInput>,
) -> AppResult<Json<Vehicle>> {
    require(&current_user.0, "fleet", "edit")?;
    let service = FleetService::new(state.db);
    let vehicle = service.update_vehicle(vehicle_id, input).await?;
    Ok(Json(vehicle))
}

/// Record a refuel
pub async fn record_refuel(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
    Json(input): Json<RecordRefuelInput>,
) -> AppResult<Json<RefuelView>> {
    require(&current_user.0, "fleet", "create")?;
    let service = FleetService::new(state.db);
    let refuel = service
        .record_refuel(vehicle_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(refuel))
}

/// Refuel history with per-leg consumption
pub async fn list_refuels(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<Json<Vec<RefuelView>>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let refuels = service.list_refuels(vehicle_id).await?;
    Ok(Json(refuels))
}

/// Plan a maintenance event
pub async fn create_maintenance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
    Json(input): Json<CreateMaintenanceInput>,
) -> AppResult<Json<MaintenanceEvent>> {
    require(&current_user.0, "fleet", "create")?;
    let service = FleetService::new(state.db);
    let event = service.create_maintenance(vehicle_id, input).await?;
    Ok(Json(event))
}

/// Complete a maintenance event
pub async fn complete_maintenance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(maintenance_id): Path<Uuid>,
    Json(input): Json<CompleteMaintenanceInput>,
) -> AppResult<Json<MaintenanceEvent>> {
    require(&current_user.0, "fleet", "edit")?;
    let service = FleetService::new(state.db);
    let event = service.complete_maintenance(maintenance_id, input).await?;
    Ok(Json(event))
}

/// List maintenance events of a vehicle
pub async fn list_maintenance(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<Json<Vec<MaintenanceEvent>>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let events = service.list_maintenance(vehicle_id).await?;
    Ok(Json(events))
}

/// Record a vehicle document
pub async fn create_vehicle_document(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
    Json(input): Json<CreateDocumentInput>,
) -> AppResult<Json<VehicleDocument>> {
    require(&current_user.0, "fleet", "create")?;
    let service = FleetService::new(state.db);
    let document = service.create_document(vehicle_id, input).await?;
    Ok(Json(document))
}

/// List documents of a vehicle
pub async fn list_vehicle_documents(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<Json<Vec<VehicleDocument>>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let documents = service.list_documents(vehicle_id).await?;
    Ok(Json(documents))
}

/// Documents expiring across the fleet
pub async fn list_expiring_documents(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ExpiryParams>,
) -> AppResult<Json<Vec<VehicleDocument>>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let documents = service.list_expiring_documents(params.days).await?;
    Ok(Json(documents))
}

/// List fuel types
pub async fn list_fuel_types(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<FuelType>>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let fuel_types = service.list_fuel_types().await?;
    Ok(Json(fuel_types))
}

/// Recompute and return the statistics snapshot of a vehicle
pub async fn get_vehicle_statistics(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<Json<FleetStatistics>> {
    require(&current_user.0, "fleet", "view")?;
    let service = FleetService::new(state.db);
    let stats = service.recompute_statistics(vehicle_id).await?;
    Ok(Json(stats))
}
