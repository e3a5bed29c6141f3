//! Asset API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::asset::{Asset, AssetDetails, AssetQuery, CreateAsset, UpdateAsset, UpdateAssetStatus},
};

use super::AuthenticatedUser;

/// List assets
#[utoipa::path(
    get,
    path = "/assets",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(AssetQuery),
    responses(
        (status = 200, description = "Assets, newest first", body = Vec<Asset>)
    )
)]
pub async fn list_assets(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<AssetQuery>,
) -> AppResult<Json<Vec<Asset>>> {
    let assets = state.services.assets.list(&query).await?;
    Ok(Json(assets))
}

/// Get asset details with maintenance history
#[utoipa::path(
    get,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset details", body = AssetDetails),
        (status = 404, description = "Asset not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_asset(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AssetDetails>> {
    let details = state
        .services
        .assets
        .details(id, Utc::now().date_naive())
        .await?;
    Ok(Json(details))
}

/// Create an asset
#[utoipa::path(
    post,
    path = "/assets",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = CreateAsset,
    responses(
        (status = 201, description = "Asset created", body = Asset),
        (status = 400, description = "Invalid asset", body = crate::error::ErrorResponse),
        (status = 409, description = "Serial number already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_asset(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Json(data): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    let asset = state.services.assets.create(data).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// Update an asset
#[utoipa::path(
    put,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    request_body = UpdateAsset,
    responses(
        (status = 200, description = "Asset updated", body = Asset),
        (status = 404, description = "Asset not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Serial number already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_asset(
    State(state): State<crate::AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    let asset = state.services.assets.update(id, data).await?;
    Ok(Json(asset))
}

/// Delete an asset and its maintenance history (admin only)
#[utoipa::path(
    delete,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 204, description = "Asset deleted"),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_asset(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.assets.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change an asset's status and log it as a repair record
#[utoipa::path(
    put,
    path = "/assets/{id}/status",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    request_body = UpdateAssetStatus,
    responses(
        (status = 200, description = "Status updated", body = Asset),
        (status = 403, description = "Technician or Admin privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Asset not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_asset_status(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAssetStatus>,
) -> AppResult<Json<Asset>> {
    let asset = state
        .services
        .assets
        .set_status(&user.caller(), id, &request, Utc::now().date_naive())
        .await?;
    Ok(Json(asset))
}
