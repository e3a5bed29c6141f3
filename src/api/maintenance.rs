//! Maintenance log API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::maintenance::{
        CreateMaintenance, MaintenanceEntry, MaintenanceOutcome, MaintenanceQuery,
        MaintenanceRecord, MaintenanceStats, UpdateMaintenance,
    },
};

use super::AuthenticatedUser;

/// List maintenance records
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(MaintenanceQuery),
    responses(
        (status = 200, description = "Maintenance records, newest first", body = Vec<MaintenanceEntry>)
    )
)]
pub async fn list_maintenance(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<MaintenanceQuery>,
) -> AppResult<Json<Vec<MaintenanceEntry>>> {
    let entries = state.services.maintenance.list(&query).await?;
    Ok(Json(entries))
}

/// Log a maintenance event
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenance,
    responses(
        (status = 201, description = "Record logged, asset status updated", body = MaintenanceOutcome),
        (status = 400, description = "Missing or invalid field", body = crate::error::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_maintenance(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Json(data): Json<CreateMaintenance>,
) -> AppResult<(StatusCode, Json<MaintenanceOutcome>)> {
    let outcome = state.services.maintenance.record(data).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Maintenance counters
#[utoipa::path(
    get,
    path = "/maintenance/stats",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Maintenance statistics", body = MaintenanceStats)
    )
)]
pub async fn maintenance_stats(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<MaintenanceStats>> {
    let stats = state.services.maintenance.stats(Utc::now().date_naive()).await?;
    Ok(Json(stats))
}

/// Get a maintenance record
#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 200, description = "Maintenance record", body = MaintenanceRecord),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_maintenance(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenanceRecord>> {
    let record = state.services.maintenance.get_by_id(id).await?;
    Ok(Json(record))
}

/// Edit a maintenance record (technician or admin)
#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    request_body = UpdateMaintenance,
    responses(
        (status = 200, description = "Record updated", body = MaintenanceRecord),
        (status = 403, description = "Technician or Admin privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_maintenance(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateMaintenance>,
) -> AppResult<Json<MaintenanceRecord>> {
    let record = state
        .services
        .maintenance
        .update(&user.caller(), id, data)
        .await?;
    Ok(Json(record))
}

/// Delete a maintenance record (admin only)
#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_maintenance(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.maintenance.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
