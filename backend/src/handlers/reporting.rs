//! HTTP handlers for dashboard and export endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::require;
use crate::middleware::CurrentUser;
use crate::services::reporting::{DashboardMetrics, ReportingService};
use crate::AppState;
use shared::Language;

/// Query parameters for exports
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub language: Option<Language>,
}

fn csv_response(filename: &str, csv_data: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv_data,
    )
}

/// Dashboard metrics
pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    require(&current_user.0, "report", "view")?;
    let service = ReportingService::new(state.db);
    let metrics = service.get_dashboard_metrics().await?;
    Ok(Json(metrics))
}

/// Export orders as CSV
pub async fn export_orders_csv(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    require(&current_user.0, "report", "export")?;
    let service = ReportingService::new(state.db);
    let csv_data = service
        .export_orders_csv(params.language.unwrap_or_default())
        .await?;
    Ok(csv_response("orders.csv", csv_data))
}

/// Export warehouse stock as CSV
pub async fn export_inventory_csv(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    require(&current_user.0, "report", "export")?;
    let service = ReportingService::new(state.db);
    let csv_data = service
        .export_inventory_csv(params.language.unwrap_or_default())
        .await?;
    Ok(csv_response("inventory.csv", csv_data))
}

/// Export fleet cost statistics as CSV
pub async fn export_fleet_costs_csv(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    require(&current_user.0, "report", "export")?;
    let service = ReportingService::new(state.db);
    let csv_data = service.export_fleet_costs_csv().await?;
    Ok(csv_response("fleet-costs.csv", csv_data))
}
