//! Report payloads

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    asset::Asset,
    enums::{AssetStatus, MaintenanceType},
    maintenance::MaintenanceStats,
    user::UserStats,
};

/// Per-category counts split by status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TypeBreakdown {
    pub asset_type: String,
    pub count: i64,
    pub available: i64,
    pub in_use: i64,
    pub under_maintenance: i64,
    pub retired: i64,
    pub total_value: Decimal,
    /// Share of all assets, 0 when there are none
    pub percentage: f64,
}

/// Per-status counts and value
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusBreakdown {
    pub status: AssetStatus,
    pub label: String,
    pub count: i64,
    pub total_value: Decimal,
    pub percentage: f64,
}

/// Per-maintenance-type record count and cost
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceTypeTotals {
    pub maintenance_type: MaintenanceType,
    pub records: i64,
    pub total_cost: Decimal,
    pub average_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryReport {
    pub generated_on: NaiveDate,
    pub total_assets: i64,
    pub total_value: Decimal,
    pub by_type: Vec<TypeBreakdown>,
    pub by_status: Vec<StatusBreakdown>,
    pub maintenance: Vec<MaintenanceTypeTotals>,
}

/// One row of the detailed report
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DetailedAssetRow {
    #[serde(flatten)]
    pub asset: Asset,
    pub maintenance_count: i64,
    pub total_maintenance_cost: Decimal,
    pub last_maintenance_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DetailedReport {
    pub generated_on: NaiveDate,
    pub total_assets: i64,
    pub total_value: Decimal,
    pub assets: Vec<DetailedAssetRow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoricalReport {
    pub generated_on: NaiveDate,
    pub total_assets: i64,
    pub total_value: Decimal,
    pub by_type: Vec<TypeBreakdown>,
    /// Always lists every status, in lifecycle order
    pub by_status: Vec<StatusBreakdown>,
}

/// Landing page figures
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub total_assets: i64,
    pub total_value: Decimal,
    pub by_status: Vec<StatusBreakdown>,
    pub by_type: Vec<TypeBreakdown>,
    pub recent_assets: Vec<Asset>,
    pub maintenance: MaintenanceStats,
    pub users: UserStats,
}
