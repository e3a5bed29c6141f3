//! Inventory reports and dashboard
//!
//! Reports are built in memory from the full asset list and maintenance log.
//! The builders are plain functions so they can be checked without a store.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    error::AppResult,
    models::{
        asset::{Asset, AssetQuery},
        enums::{AssetStatus, MaintenanceType},
        maintenance::{MaintenanceRecord, MaintenanceStats},
        report::{
            CategoricalReport, DashboardReport, DetailedAssetRow, DetailedReport,
            MaintenanceTypeTotals, StatusBreakdown, SummaryReport, TypeBreakdown,
        },
        user::UserStats,
    },
    repository::{AssetStore, MaintenanceStore, UserStore},
};

use super::maintenance::UPCOMING_WINDOW_DAYS;

/// Number of assets shown in the dashboard's "recently added" list
pub const RECENT_ASSETS: usize = 5;

#[derive(Clone)]
pub struct ReportsService {
    assets: Arc<dyn AssetStore>,
    maintenance: Arc<dyn MaintenanceStore>,
    users: Arc<dyn UserStore>,
}

impl ReportsService {
    pub fn new(
        assets: Arc<dyn AssetStore>,
        maintenance: Arc<dyn MaintenanceStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self { assets, maintenance, users }
    }

    async fn all_assets(&self) -> AppResult<Vec<Asset>> {
        self.assets.list(&AssetQuery::default()).await
    }

    pub async fn summary(&self, today: NaiveDate) -> AppResult<SummaryReport> {
        let assets = self.all_assets().await?;
        let records = self.maintenance.records(None).await?;
        Ok(build_summary(today, &assets, &records))
    }

    pub async fn detailed(&self, today: NaiveDate) -> AppResult<DetailedReport> {
        let assets = self.all_assets().await?;
        let records = self.maintenance.records(None).await?;
        Ok(build_detailed(today, assets, &records))
    }

    pub async fn categorical(&self, today: NaiveDate) -> AppResult<CategoricalReport> {
        let assets = self.all_assets().await?;
        Ok(build_categorical(today, &assets))
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> AppResult<DashboardReport> {
        let assets = self.all_assets().await?;
        let maintenance = self
            .maintenance
            .stats(now.date_naive() + Duration::days(UPCOMING_WINDOW_DAYS))
            .await?;
        let users = UserStats::from_counts(&self.users.count_by_role().await?);
        Ok(build_dashboard(now, assets, maintenance, users))
    }
}

/// `count / total * 100`, 0 when there is nothing to divide by
fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

fn total_value(assets: &[Asset]) -> Decimal {
    assets.iter().map(|a| a.current_value).sum()
}

pub fn type_breakdown(assets: &[Asset]) -> Vec<TypeBreakdown> {
    let total = assets.len() as i64;
    let mut groups: BTreeMap<&str, TypeBreakdown> = BTreeMap::new();

    for asset in assets {
        let entry = groups
            .entry(asset.asset_type.as_str())
            .or_insert_with(|| TypeBreakdown {
                asset_type: asset.asset_type.clone(),
                count: 0,
                available: 0,
                in_use: 0,
                under_maintenance: 0,
                retired: 0,
                total_value: Decimal::ZERO,
                percentage: 0.0,
            });
        entry.count += 1;
        entry.total_value += asset.current_value;
        match asset.status {
            AssetStatus::Available => entry.available += 1,
            AssetStatus::InUse => entry.in_use += 1,
            AssetStatus::UnderMaintenance => entry.under_maintenance += 1,
            AssetStatus::Retired => entry.retired += 1,
        }
    }

    groups
        .into_values()
        .map(|mut row| {
            row.percentage = percentage(row.count, total);
            row
        })
        .collect()
}

/// One row per status, including statuses no asset currently has
pub fn status_breakdown(assets: &[Asset]) -> Vec<StatusBreakdown> {
    let total = assets.len() as i64;
    AssetStatus::ALL
        .iter()
        .map(|&status| {
            let matching: Vec<&Asset> = assets.iter().filter(|a| a.status == status).collect();
            let count = matching.len() as i64;
            StatusBreakdown {
                status,
                label: status.label().to_string(),
                count,
                total_value: matching.iter().map(|a| a.current_value).sum(),
                percentage: percentage(count, total),
            }
        })
        .collect()
}

pub fn maintenance_totals(records: &[MaintenanceRecord]) -> Vec<MaintenanceTypeTotals> {
    MaintenanceType::ALL
        .iter()
        .map(|&kind| {
            let (count, total_cost) = records
                .iter()
                .filter(|r| r.maintenance_type == kind)
                .fold((0i64, Decimal::ZERO), |(n, sum), r| (n + 1, sum + r.cost));
            let average_cost = if count == 0 {
                Decimal::ZERO
            } else {
                (total_cost / Decimal::from(count)).round_dp(2)
            };
            MaintenanceTypeTotals {
                maintenance_type: kind,
                records: count,
                total_cost,
                average_cost,
            }
        })
        .collect()
}

pub fn build_summary(today: NaiveDate, assets: &[Asset], records: &[MaintenanceRecord]) -> SummaryReport {
    SummaryReport {
        generated_on: today,
        total_assets: assets.len() as i64,
        total_value: total_value(assets),
        by_type: type_breakdown(assets),
        by_status: status_breakdown(assets),
        maintenance: maintenance_totals(records),
    }
}

/// Every asset with its maintenance figures, ordered by type then name
pub fn build_detailed(today: NaiveDate, mut assets: Vec<Asset>, records: &[MaintenanceRecord]) -> DetailedReport {
    assets.sort_by(|a, b| {
        a.asset_type
            .cmp(&b.asset_type)
            .then_with(|| a.name.cmp(&b.name))
            .then(a.id.cmp(&b.id))
    });

    let mut per_asset: BTreeMap<i32, (i64, Decimal, Option<NaiveDate>)> = BTreeMap::new();
    for record in records {
        let entry = per_asset
            .entry(record.asset_id)
            .or_insert((0, Decimal::ZERO, None));
        entry.0 += 1;
        entry.1 += record.cost;
        entry.2 = entry.2.max(Some(record.maintenance_date));
    }

    let total_assets = assets.len() as i64;
    let total_value = total_value(&assets);
    let rows = assets
        .into_iter()
        .map(|asset| {
            let (maintenance_count, total_maintenance_cost, last_maintenance_date) = per_asset
                .get(&asset.id)
                .copied()
                .unwrap_or((0, Decimal::ZERO, None));
            DetailedAssetRow {
                asset,
                maintenance_count,
                total_maintenance_cost,
                last_maintenance_date,
            }
        })
        .collect();

    DetailedReport {
        generated_on: today,
        total_assets,
        total_value,
        assets: rows,
    }
}

pub fn build_categorical(today: NaiveDate, assets: &[Asset]) -> CategoricalReport {
    CategoricalReport {
        generated_on: today,
        total_assets: assets.len() as i64,
        total_value: total_value(assets),
        by_type: type_breakdown(assets),
        by_status: status_breakdown(assets),
    }
}

pub fn build_dashboard(
    now: DateTime<Utc>,
    assets: Vec<Asset>,
    maintenance: MaintenanceStats,
    users: UserStats,
) -> DashboardReport {
    let by_status = status_breakdown(&assets);
    let by_type = type_breakdown(&assets);
    let total_assets = assets.len() as i64;
    let total_value = total_value(&assets);

    let mut recent_assets = assets;
    recent_assets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    recent_assets.truncate(RECENT_ASSETS);

    DashboardReport {
        generated_at: now,
        total_assets,
        total_value,
        by_status,
        by_type,
        recent_assets,
        maintenance,
        users,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::enums::Role,
        repository::{MockAssetStore, MockMaintenanceStore, MockUserStore},
        test_support::{asset_with, sample_record},
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn inventory() -> Vec<Asset> {
        vec![
            asset_with(1, "Laptop", AssetStatus::Available, 1000),
            asset_with(2, "Laptop", AssetStatus::UnderMaintenance, 800),
            asset_with(3, "Projector", AssetStatus::InUse, 400),
            asset_with(4, "Router", AssetStatus::Available, 150),
            asset_with(5, "Laptop", AssetStatus::InUse, 900),
            asset_with(6, "Router", AssetStatus::Available, 150),
            asset_with(7, "Printer", AssetStatus::Available, 300),
        ]
    }

    #[test]
    fn categorical_percentages_sum_to_hundred() {
        let report = build_categorical(day(14), &inventory());

        assert_eq!(report.by_status.len(), AssetStatus::ALL.len());
        let sum: f64 = report.by_status.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-6);
        let sum: f64 = report.by_type.iter().map(|t| t.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-6);

        let retired = &report.by_status[3];
        assert_eq!(retired.status, AssetStatus::Retired);
        assert_eq!(retired.count, 0);
    }

    #[test]
    fn empty_inventory_has_zero_percentages() {
        let report = build_categorical(day(14), &[]);

        assert_eq!(report.total_assets, 0);
        assert!(report.by_type.is_empty());
        assert!(report.by_status.iter().all(|s| s.percentage == 0.0 && s.count == 0));
    }

    #[test]
    fn type_breakdown_splits_by_status() {
        let rows = type_breakdown(&inventory());

        let laptops = rows.iter().find(|r| r.asset_type == "Laptop").unwrap();
        assert_eq!(laptops.count, 3);
        assert_eq!(laptops.available, 1);
        assert_eq!(laptops.in_use, 1);
        assert_eq!(laptops.under_maintenance, 1);
        assert_eq!(laptops.total_value, Decimal::new(2700, 0));
        assert_eq!(rows.iter().map(|r| r.asset_type.as_str()).collect::<Vec<_>>(), ["Laptop", "Printer", "Projector", "Router"]);
    }

    #[test]
    fn summary_averages_maintenance_cost() {
        let mut repair = sample_record(3, 2, day(3), 90);
        repair.maintenance_type = MaintenanceType::Repair;
        let records = vec![sample_record(1, 1, day(1), 10), sample_record(2, 1, day(2), 25), repair];

        let report = build_summary(day(14), &inventory(), &records);

        assert_eq!(report.total_value, Decimal::new(3700, 0));
        let routine = &report.maintenance[0];
        assert_eq!(routine.records, 2);
        assert_eq!(routine.total_cost, Decimal::new(35, 0));
        assert_eq!(routine.average_cost, Decimal::new(1750, 2));
        let upgrade = &report.maintenance[2];
        assert_eq!(upgrade.records, 0);
        assert_eq!(upgrade.average_cost, Decimal::ZERO);
    }

    #[test]
    fn detailed_report_orders_by_type_then_name() {
        let records = vec![sample_record(1, 2, day(1), 10), sample_record(2, 2, day(9), 15)];

        let report = build_detailed(day(14), inventory(), &records);

        let order: Vec<i32> = report.assets.iter().map(|r| r.asset.id).collect();
        assert_eq!(order, [1, 2, 5, 7, 3, 4, 6]);
        let row = report.assets.iter().find(|r| r.asset.id == 2).unwrap();
        assert_eq!(row.maintenance_count, 2);
        assert_eq!(row.total_maintenance_cost, Decimal::new(25, 0));
        assert_eq!(row.last_maintenance_date, Some(day(9)));
    }

    #[tokio::test]
    async fn dashboard_lists_five_most_recent_assets() {
        let mut assets = MockAssetStore::new();
        assets.expect_list().returning(|_| Ok(inventory()));
        let mut maintenance = MockMaintenanceStore::new();
        maintenance.expect_stats().returning(|_| {
            Ok(MaintenanceStats { assets_under_maintenance: 1, ..Default::default() })
        });
        let mut users = MockUserStore::new();
        users
            .expect_count_by_role()
            .returning(|| Ok(vec![(Role::Admin, 1), (Role::Technician, 2)]));

        let service = ReportsService::new(Arc::new(assets), Arc::new(maintenance), Arc::new(users));
        let report = service.dashboard(Utc::now()).await.unwrap();

        assert_eq!(report.total_assets, 7);
        let recent: Vec<i32> = report.recent_assets.iter().map(|a| a.id).collect();
        assert_eq!(recent, [7, 6, 5, 4, 3]);
        assert_eq!(report.users.total, 3);
        assert_eq!(report.maintenance.assets_under_maintenance, 1);
    }
}
