//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assets, auth, health, maintenance, reports, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Labinv API",
        version = "0.3.0",
        description = "IT asset inventory and maintenance tracking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Assets
        assets::list_assets,
        assets::get_asset,
        assets::create_asset,
        assets::update_asset,
        assets::delete_asset,
        assets::update_asset_status,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::create_maintenance,
        maintenance::maintenance_stats,
        maintenance::get_maintenance,
        maintenance::update_maintenance,
        maintenance::delete_maintenance,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::delete_user,
        users::update_user_role,
        users::user_stats,
        // Reports
        reports::summary_report,
        reports::detailed_report,
        reports::categorical_report,
        reports::dashboard,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::AssetStatus,
            crate::models::enums::MaintenanceType,
            crate::models::enums::Role,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Assets
            crate::models::asset::Asset,
            crate::models::asset::AssetDetails,
            crate::models::asset::CreateAsset,
            crate::models::asset::UpdateAsset,
            crate::models::asset::UpdateAssetStatus,
            // Maintenance
            crate::models::maintenance::MaintenanceRecord,
            crate::models::maintenance::MaintenanceEntry,
            crate::models::maintenance::CreateMaintenance,
            crate::models::maintenance::UpdateMaintenance,
            crate::models::maintenance::MaintenanceOutcome,
            crate::models::maintenance::MaintenanceStats,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateRole,
            crate::models::user::UserStats,
            // Reports
            crate::models::report::TypeBreakdown,
            crate::models::report::StatusBreakdown,
            crate::models::report::MaintenanceTypeTotals,
            crate::models::report::SummaryReport,
            crate::models::report::DetailedAssetRow,
            crate::models::report::DetailedReport,
            crate::models::report::CategoricalReport,
            crate::models::report::DashboardReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "assets", description = "Asset inventory"),
        (name = "maintenance", description = "Maintenance log"),
        (name = "users", description = "User management"),
        (name = "reports", description = "Reports and dashboard")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/assets/{id}/status", "/maintenance/stats", "/users/{id}/role", "/dashboard"] {
            assert!(doc.paths.paths.contains_key(path), "{} missing", path);
        }
    }
}
