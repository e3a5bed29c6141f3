//! Asset model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{enums::AssetStatus, maintenance::MaintenanceRecord};

/// Asset record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Asset {
    pub id: i32,
    pub name: String,
    /// Free-text category (Laptop, Projector, Router, ...)
    pub asset_type: String,
    /// Unique when present
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub specifications: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Decimal,
    pub current_value: Decimal,
    pub status: AssetStatus,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Asset list filters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct AssetQuery {
    /// Case-insensitive match on name, serial number or model
    pub search: Option<String>,
    pub status: Option<AssetStatus>,
}

/// Create asset request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateAsset {
    #[validate(length(max = 200, message = "Asset name must be at most 200 characters"))]
    pub name: String,
    #[validate(length(max = 100, message = "Asset type must be at most 100 characters"))]
    pub asset_type: String,
    #[validate(length(max = 100, message = "Serial number must be at most 100 characters"))]
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub specifications: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub status: Option<AssetStatus>,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
}

/// Update asset request (absent fields are left untouched)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAsset {
    #[validate(length(max = 200, message = "Asset name must be at most 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "Asset type must be at most 100 characters"))]
    pub asset_type: Option<String>,
    /// An empty string clears the serial number
    #[validate(length(max = 100, message = "Serial number must be at most 100 characters"))]
    pub serial_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub specifications: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub status: Option<AssetStatus>,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
}

/// Quick status change request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAssetStatus {
    pub status: AssetStatus,
    pub notes: Option<String>,
}

/// Asset with its maintenance history and derived figures
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssetDetails {
    #[serde(flatten)]
    pub asset: Asset,
    pub maintenance_count: i64,
    pub total_maintenance_cost: Decimal,
    pub last_maintenance_date: Option<NaiveDate>,
    /// Whole years since purchase
    pub age_years: Option<u32>,
    pub depreciation_amount: Decimal,
    pub depreciation_percentage: f64,
    pub maintenance_history: Vec<MaintenanceRecord>,
}

impl AssetDetails {
    /// Derive the detail figures from an asset and its maintenance history
    pub fn build(asset: Asset, mut history: Vec<MaintenanceRecord>, today: NaiveDate) -> Self {
        history.sort_by(|a, b| {
            b.maintenance_date
                .cmp(&a.maintenance_date)
                .then(b.created_at.cmp(&a.created_at))
        });

        let total_maintenance_cost = history.iter().map(|r| r.cost).sum();
        let last_maintenance_date = history.iter().map(|r| r.maintenance_date).max();
        let age_years = asset.purchase_date.and_then(|d| today.years_since(d));

        let depreciation_amount = asset.purchase_price - asset.current_value;
        let depreciation_percentage = percentage_of(depreciation_amount, asset.purchase_price);

        Self {
            maintenance_count: history.len() as i64,
            total_maintenance_cost,
            last_maintenance_date,
            age_years,
            depreciation_amount,
            depreciation_percentage,
            maintenance_history: history,
            asset,
        }
    }
}

/// `part / whole * 100`, or 0 when `whole` is not positive
fn percentage_of(part: Decimal, whole: Decimal) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    let ratio = part / whole * Decimal::ONE_HUNDRED;
    rust_decimal::prelude::ToPrimitive::to_f64(&ratio).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_asset, sample_record};

    #[test]
    fn details_aggregate_history() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        let details = AssetDetails::build(sample_asset(), vec![sample_record(1, 1, d1, 40), sample_record(2, 1, d2, 60)], today);

        assert_eq!(details.maintenance_count, 2);
        assert_eq!(details.total_maintenance_cost, Decimal::new(100, 0));
        assert_eq!(details.last_maintenance_date, Some(d2));
        assert_eq!(details.maintenance_history[0].id, 2);
        assert_eq!(details.age_years, Some(2));
        assert_eq!(details.depreciation_amount, Decimal::new(500, 0));
        assert!((details.depreciation_percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn zero_purchase_price_has_no_depreciation_percentage() {
        let mut asset = sample_asset();
        asset.purchase_price = Decimal::ZERO;
        asset.current_value = Decimal::ZERO;
        asset.purchase_date = None;

        let details = AssetDetails::build(asset, Vec::new(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        assert_eq!(details.depreciation_percentage, 0.0);
        assert_eq!(details.age_years, None);
        assert_eq!(details.last_maintenance_date, None);
        assert_eq!(details.total_maintenance_cost, Decimal::ZERO);
    }
}
