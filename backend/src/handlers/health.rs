//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::AppState;

/// Health status payload
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Health check that also pings the database
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthStatus>> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => "up",
        Err(_) => "down",
    };

    Ok(Json(HealthStatus {
        status: "ok",
        database,
    }))
}
