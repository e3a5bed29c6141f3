//! Maintenance record model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{AssetStatus, MaintenanceType};

/// Maintenance record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceRecord {
    pub id: i32,
    pub asset_id: i32,
    pub maintenance_date: NaiveDate,
    pub maintenance_type: MaintenanceType,
    pub description: Option<String>,
    pub cost: Decimal,
    pub performed_by: Option<String>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Maintenance record joined with the asset it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub asset_name: String,
    pub serial_number: Option<String>,
    pub asset_status: AssetStatus,
}

/// Maintenance list filters (AND-combined, date bounds inclusive)
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct MaintenanceQuery {
    pub asset_id: Option<i32>,
    pub maintenance_type: Option<MaintenanceType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Create maintenance request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateMaintenance {
    pub asset_id: Option<i32>,
    pub maintenance_date: Option<NaiveDate>,
    pub maintenance_type: Option<MaintenanceType>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    #[validate(length(max = 100, message = "Performed by must be at most 100 characters"))]
    pub performed_by: Option<String>,
    pub next_maintenance_date: Option<NaiveDate>,
    /// Explicit status for the asset; when absent the status follows the maintenance type
    pub new_asset_status: Option<AssetStatus>,
}

/// Validated maintenance submission handed to the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenance {
    pub asset_id: i32,
    pub maintenance_date: NaiveDate,
    pub maintenance_type: MaintenanceType,
    pub description: Option<String>,
    pub cost: Decimal,
    pub performed_by: Option<String>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub new_asset_status: Option<AssetStatus>,
}

/// Update maintenance request
///
/// Absent fields are left untouched. An empty `description` or `performed_by`
/// clears the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMaintenance {
    pub maintenance_date: Option<NaiveDate>,
    pub maintenance_type: Option<MaintenanceType>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    pub cost: Option<Decimal>,
    #[validate(length(max = 100, message = "Performed by must be at most 100 characters"))]
    pub performed_by: Option<String>,
    pub next_maintenance_date: Option<NaiveDate>,
    /// Remove the next maintenance date; ignored when `next_maintenance_date` is set
    #[serde(default)]
    pub clear_next_maintenance_date: bool,
}

impl UpdateMaintenance {
    /// Whether the request changes any column
    pub fn is_empty(&self) -> bool {
        self.maintenance_date.is_none()
            && self.maintenance_type.is_none()
            && self.description.is_none()
            && self.cost.is_none()
            && self.performed_by.is_none()
            && self.next_maintenance_date.is_none()
            && !self.clear_next_maintenance_date
    }
}

/// Result of logging maintenance: the record and the asset status transition it caused
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceOutcome {
    pub record: MaintenanceRecord,
    pub asset_name: String,
    pub previous_status: AssetStatus,
    pub new_status: AssetStatus,
}

impl MaintenanceOutcome {
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.new_status
    }
}

/// Maintenance page counters
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct MaintenanceStats {
    pub total_records: i64,
    pub total_cost: Decimal,
    /// Assets whose next maintenance is due within the next 30 days (or overdue)
    pub upcoming_maintenance: i64,
    pub assets_under_maintenance: i64,
}
