//! User management endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateRole, User, UserStats},
};

use super::AuthenticatedUser;

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Users, newest first", body = Vec<User>),
        (status = 403, description = "Administrator privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list(&user.caller()).await?;
    Ok(Json(users))
}

/// Get a user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    let found = state.services.users.get_by_id(&user.caller(), id).await?;
    Ok(Json(found))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid user", body = crate::error::ErrorResponse),
        (status = 409, description = "Username or email already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(data): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.users.create(&user.caller(), data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 409, description = "Cannot remove the last admin", body = crate::error::ErrorResponse),
        (status = 422, description = "Cannot delete own account", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.users.delete(&user.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 409, description = "Cannot demote the last admin", body = crate::error::ErrorResponse),
        (status = 422, description = "Cannot change own role", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user_role(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateRole>,
) -> AppResult<Json<User>> {
    let updated = state
        .services
        .users
        .update_role(&user.caller(), id, data.role)
        .await?;
    Ok(Json(updated))
}

/// Number of users per role
#[utoipa::path(
    get,
    path = "/users/stats",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User counts", body = UserStats)
    )
)]
pub async fn user_stats(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<UserStats>> {
    user.caller().require_admin()?;
    let stats = state.services.users.stats().await?;
    Ok(Json(stats))
}
