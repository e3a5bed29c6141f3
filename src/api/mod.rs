//! API handlers for Labinv REST endpoints

pub mod assets;
pub mod auth;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod reports;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::user::{Caller, UserClaims},
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

impl AuthenticatedUser {
    pub fn caller(&self) -> Caller {
        self.0.caller()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.users.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Assets
        .route("/assets", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/assets/:id",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/assets/:id/status", put(assets::update_asset_status))
        // Maintenance
        .route(
            "/maintenance",
            get(maintenance::list_maintenance).post(maintenance::create_maintenance),
        )
        .route("/maintenance/stats", get(maintenance::maintenance_stats))
        .route(
            "/maintenance/:id",
            get(maintenance::get_maintenance)
                .put(maintenance::update_maintenance)
                .delete(maintenance::delete_maintenance),
        )
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/stats", get(users::user_stats))
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .route("/users/:id/role", put(users::update_user_role))
        // Reports
        .route("/reports/summary", get(reports::summary_report))
        .route("/reports/detailed", get(reports::detailed_report))
        .route("/reports/categorical", get(reports::categorical_report))
        .route("/dashboard", get(reports::dashboard))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig,
        models::enums::Role,
        repository::{MockAssetStore, MockMaintenanceStore, MockStoreHealth, MockUserStore},
        services::Services,
        test_support::sample_asset,
    };

    fn state(assets: MockAssetStore, healthy: bool) -> AppState {
        let mut health = MockStoreHealth::new();
        health.expect_ping().returning(move || {
            if healthy {
                Ok(())
            } else {
                Err(AppError::Internal("connection refused".to_string()))
            }
        });
        let config = AppConfig::default();
        let services = Services::from_stores(
            Arc::new(assets),
            Arc::new(MockMaintenanceStore::new()),
            Arc::new(MockUserStore::new()),
            Arc::new(health),
            config.users.clone(),
        );
        AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }

    fn bearer(role: Role) -> String {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: "tester".to_string(),
            user_id: 42,
            full_name: "Test User".to_string(),
            role,
            exp: now + 600,
            iat: now,
        };
        let token = claims.create_token(&AppConfig::default().users.jwt_secret).unwrap();
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = create_router(state(MockAssetStore::new(), true))
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_reports_store_outage() {
        let response = create_router(state(MockAssetStore::new(), false))
            .oneshot(Request::get("/api/v1/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let response = create_router(state(MockAssetStore::new(), true))
            .oneshot(Request::get("/api/v1/assets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn authenticated_listing() {
        let mut assets = MockAssetStore::new();
        assets.expect_list().returning(|_| Ok(vec![sample_asset()]));

        let request = Request::get("/api/v1/assets?status=available")
            .header(AUTHORIZATION, bearer(Role::User))
            .body(Body::empty())
            .unwrap();
        let response = create_router(state(assets, true)).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn plain_user_cannot_delete_assets() {
        let mut assets = MockAssetStore::new();
        assets.expect_delete().never();

        let request = Request::delete("/api/v1/assets/1")
            .header(AUTHORIZATION, bearer(Role::User))
            .body(Body::empty())
            .unwrap();
        let response = create_router(state(assets, true)).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
