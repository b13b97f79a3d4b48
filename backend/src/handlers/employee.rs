//! HTTP handlers for employee and time-tracking endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::employee::{EmployeeInput, EmployeeService, WorkDayInput, WorkDayView};
use crate::AppState;
use shared::Employee;

/// Query parameters for work day ranges
#[derive(Debug, Deserialize)]
pub struct WorkDayRangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Create an employee
pub async fn create_employee(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<EmployeeInput>,
) -> AppResult<Json<Employee>> {
    require(&current_user.0, "employee", "create")?;
    let service = EmployeeService::new(state.db);
    let employee = service.create_employee(input).await?;
    Ok(Json(employee))
}

/// List employees
pub async fn list_employees(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Employee>>> {
    require(&current_user.0, "employee", "view")?;
    let service = EmployeeService::new(state.db);
    let employees = service.list_employees().await?;
    Ok(Json(employees))
}

/// Get an employee
pub async fn get_employee(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    require(&current_user.0, "employee", "view")?;
    let service = EmployeeService::new(state.db);
    let employee = service.get_employee(employee_id).await?;
    Ok(Json(employee))
}

/// Update an employee
pub async fn update_employee(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(employee_id): Path<Uuid>,
    Json(input): Json<EmployeeInput>,
) -> AppResult<Json<Employee>> {
    require(&current_user.0, "employee", "edit")?;
    let service = EmployeeService::new(state.db);
    let employee = service.update_employee(employee_id, input).await?;
    Ok(Json(employee))
}

/// Deactivate an employee
pub async fn deactivate_employee(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    require(&current_user.0, "employee", "delete")?;
    let service = EmployeeService::new(state.db);
    service.deactivate_employee(employee_id).await?;
    Ok(Json(()))
}

/// Record or update a work day
pub async fn record_work_day(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(employee_id): Path<Uuid>,
    Json(input): Json<WorkDayInput>,
) -> AppResult<Json<WorkDayView>> {
    require(&current_user.0, "employee", "edit")?;
    let service = EmployeeService::new(state.db);
    let work_day = service.record_work_day(employee_id, input).await?;
    Ok(Json(work_day))
}

/// List work days of an employee
pub async fn list_work_days(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(employee_id): Path<Uuid>,
    Query(params): Query<WorkDayRangeParams>,
) -> AppResult<Json<Vec<WorkDayView>>> {
    require(&current_user.0, "employee", "view")?;
    let service = EmployeeService::new(state.db);
    let work_days = service
        .list_work_days(employee_id, params.from, params.to)
        .await?;
    Ok(Json(work_days))
}

/// Confirm a closed work day
pub async fn confirm_work_day(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(work_day_id): Path<Uuid>,
) -> AppResult<Json<WorkDayView>> {
    require(&current_user.0, "employee", "edit")?;
    let service = EmployeeService::new(state.db);
    let work_day = service
        .confirm_work_day(work_day_id, current_user.0.user_id)
        .await?;
    Ok(Json(work_day))
}
