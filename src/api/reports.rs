//! Report and dashboard endpoints

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::report::{CategoricalReport, DashboardReport, DetailedReport, SummaryReport},
};

use super::AuthenticatedUser;

/// Inventory summary
#[utoipa::path(
    get,
    path = "/reports/summary",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Summary report", body = SummaryReport)
    )
)]
pub async fn summary_report(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<SummaryReport>> {
    let report = state.services.reports.summary(Utc::now().date_naive()).await?;
    Ok(Json(report))
}

/// Every asset with its maintenance figures
#[utoipa::path(
    get,
    path = "/reports/detailed",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Detailed report", body = DetailedReport)
    )
)]
pub async fn detailed_report(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<DetailedReport>> {
    let report = state.services.reports.detailed(Utc::now().date_naive()).await?;
    Ok(Json(report))
}

/// Breakdown by type and status with percentages
#[utoipa::path(
    get,
    path = "/reports/categorical",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Categorical report", body = CategoricalReport)
    )
)]
pub async fn categorical_report(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<CategoricalReport>> {
    let report = state.services.reports.categorical(Utc::now().date_naive()).await?;
    Ok(Json(report))
}

/// Landing page figures
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard", body = DashboardReport)
    )
)]
pub async fn dashboard(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<DashboardReport>> {
    let report = state.services.reports.dashboard(Utc::now()).await?;
    Ok(Json(report))
}
