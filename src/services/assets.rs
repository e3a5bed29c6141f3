//! Asset inventory service

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        asset::{Asset, AssetDetails, AssetQuery, CreateAsset, UpdateAsset, UpdateAssetStatus},
        enums::MaintenanceType,
        maintenance::NewMaintenance,
        user::Caller,
    },
    repository::{AssetStore, MaintenanceStore},
};

use super::{blank_to_none, check_amount, trim_text};

#[derive(Clone)]
pub struct AssetsService {
    assets: Arc<dyn AssetStore>,
    maintenance: Arc<dyn MaintenanceStore>,
}

impl AssetsService {
    pub fn new(assets: Arc<dyn AssetStore>, maintenance: Arc<dyn MaintenanceStore>) -> Self {
        Self { assets, maintenance }
    }

    pub async fn list(&self, query: &AssetQuery) -> AppResult<Vec<Asset>> {
        self.assets.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Asset> {
        self.assets.get_by_id(id).await
    }

    /// Asset with maintenance history, age and depreciation
    pub async fn details(&self, id: i32, today: NaiveDate) -> AppResult<AssetDetails> {
        let asset = self.assets.get_by_id(id).await?;
        let history = self.maintenance.records(Some(id)).await?;
        Ok(AssetDetails::build(asset, history, today))
    }

    pub async fn create(&self, data: CreateAsset) -> AppResult<Asset> {
        data.validate()?;

        let data = CreateAsset {
            name: required(&data.name, "Asset name is required")?,
            asset_type: required(&data.asset_type, "Asset type is required")?,
            serial_number: blank_to_none(data.serial_number),
            brand: blank_to_none(data.brand),
            model: blank_to_none(data.model),
            specifications: blank_to_none(data.specifications),
            location: blank_to_none(data.location),
            assigned_to: blank_to_none(data.assigned_to),
            ..data
        };
        check_amount(data.purchase_price, "Purchase price")?;
        check_amount(data.current_value, "Current value")?;

        if let Some(ref serial) = data.serial_number {
            if self.assets.serial_exists(serial, None).await? {
                tracing::warn!("Rejected asset with duplicate serial number {}", serial);
                return Err(AppError::Duplicate(
                    "Serial number already exists in the system".to_string(),
                ));
            }
        }

        let asset = self.assets.create(&data).await?;
        tracing::info!("Created asset {} ({})", asset.id, asset.name);
        Ok(asset)
    }

    pub async fn update(&self, id: i32, data: UpdateAsset) -> AppResult<Asset> {
        data.validate()?;

        let data = UpdateAsset {
            name: data
                .name
                .as_deref()
                .map(|name| required(name, "Asset name is required"))
                .transpose()?,
            asset_type: data
                .asset_type
                .as_deref()
                .map(|kind| required(kind, "Asset type is required"))
                .transpose()?,
            serial_number: trim_text(data.serial_number),
            brand: trim_text(data.brand),
            model: trim_text(data.model),
            specifications: trim_text(data.specifications),
            location: trim_text(data.location),
            assigned_to: trim_text(data.assigned_to),
            ..data
        };
        check_amount(data.purchase_price, "Purchase price")?;
        check_amount(data.current_value, "Current value")?;

        if let Some(serial) = data.serial_number.as_deref().filter(|s| !s.is_empty()) {
            if self.assets.serial_exists(serial, Some(id)).await? {
                tracing::warn!("Rejected update of asset {}: duplicate serial {}", id, serial);
                return Err(AppError::Duplicate(
                    "Serial number already exists in the system".to_string(),
                ));
            }
        }

        let asset = self.assets.update(id, &data).await?;
        tracing::info!("Updated asset {}", id);
        Ok(asset)
    }

    pub async fn delete(&self, caller: &Caller, id: i32) -> AppResult<()> {
        caller.require_admin()?;
        self.assets.delete(id).await?;
        tracing::info!("Asset {} deleted by {}", id, caller.username);
        Ok(())
    }

    /// Force a status and log the change as a repair record dated `today`
    pub async fn set_status(
        &self,
        caller: &Caller,
        id: i32,
        request: &UpdateAssetStatus,
        today: NaiveDate,
    ) -> AppResult<Asset> {
        caller.require_technician()?;

        let mut description = format!("Asset status changed to: {}", request.status.label());
        if let Some(notes) = request.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            description.push_str(". Notes: ");
            description.push_str(notes);
        }

        let log = NewMaintenance {
            asset_id: id,
            maintenance_date: today,
            maintenance_type: MaintenanceType::Repair,
            description: Some(description),
            cost: Decimal::ZERO,
            performed_by: Some(caller.full_name.clone()),
            next_maintenance_date: None,
            new_asset_status: Some(request.status),
        };

        let asset = self.assets.set_status(id, request.status, &log).await?;
        tracing::info!("Asset {} status set to {} by {}", id, request.status.as_str(), caller.username);
        Ok(asset)
    }
}

fn required(value: &str, message: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::enums::{AssetStatus, Role},
        repository::{MockAssetStore, MockMaintenanceStore},
        test_support::{caller, sample_asset, sample_record},
    };

    fn service(assets: MockAssetStore, maintenance: MockMaintenanceStore) -> AssetsService {
        AssetsService::new(Arc::new(assets), Arc::new(maintenance))
    }

    fn thinkpad() -> CreateAsset {
        CreateAsset {
            name: "  ThinkPad X1 ".to_string(),
            asset_type: "Laptop".to_string(),
            serial_number: Some("SN123".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_serial() {
        let mut assets = MockAssetStore::new();
        assets
            .expect_serial_exists()
            .times(1)
            .returning(|serial, exclude| Ok(serial == "SN123" && exclude.is_none()));
        assets.expect_create().never();

        let err = service(assets, MockMaintenanceStore::new())
            .create(thinkpad())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn create_trims_and_stores_new_asset() {
        let mut assets = MockAssetStore::new();
        assets.expect_serial_exists().returning(|_, _| Ok(false));
        assets.expect_create().times(1).returning(|data| {
            assert_eq!(data.name, "ThinkPad X1");
            assert_eq!(data.serial_number.as_deref(), Some("SN123"));
            Ok(sample_asset())
        });

        let asset = service(assets, MockMaintenanceStore::new())
            .create(thinkpad())
            .await
            .unwrap();

        assert_eq!(asset.status, AssetStatus::Available);
    }

    #[tokio::test]
    async fn blank_serials_never_collide() {
        let mut assets = MockAssetStore::new();
        assets.expect_serial_exists().never();
        assets.expect_create().times(2).returning(|data| {
            assert!(data.serial_number.is_none());
            Ok(sample_asset())
        });
        let service = service(assets, MockMaintenanceStore::new());

        for serial in [None, Some("   ".to_string())] {
            let data = CreateAsset { serial_number: serial, ..thinkpad() };
            assert!(service.create(data).await.is_ok());
        }
    }

    #[tokio::test]
    async fn create_requires_name_and_type() {
        let service = service(MockAssetStore::new(), MockMaintenanceStore::new());

        let err = service
            .create(CreateAsset { name: " ".into(), ..thinkpad() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Asset name is required");

        let err = service
            .create(CreateAsset { asset_type: String::new(), ..thinkpad() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_negative_price() {
        let data = CreateAsset {
            purchase_price: Some(Decimal::new(-1, 0)),
            ..thinkpad()
        };

        let err = service(MockAssetStore::new(), MockMaintenanceStore::new())
            .create(data)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Purchase price")));
    }

    #[tokio::test]
    async fn update_checks_serial_against_other_assets() {
        let mut assets = MockAssetStore::new();
        assets
            .expect_serial_exists()
            .times(1)
            .returning(|_, exclude| {
                assert_eq!(exclude, Some(1));
                Ok(false)
            });
        assets.expect_update().times(1).returning(|_, _| Ok(sample_asset()));

        let data = UpdateAsset {
            serial_number: Some(" SN123 ".to_string()),
            ..Default::default()
        };
        assert!(service(assets, MockMaintenanceStore::new()).update(1, data).await.is_ok());
    }

    #[tokio::test]
    async fn update_trims_optional_text_and_keeps_blank_as_clear() {
        let mut assets = MockAssetStore::new();
        assets.expect_serial_exists().never();
        assets.expect_update().times(1).returning(|id, data| {
            assert_eq!(id, 1);
            assert_eq!(data.brand.as_deref(), Some(""));
            assert_eq!(data.location.as_deref(), Some("Lab B"));
            assert_eq!(data.model.as_deref(), Some("X1 Carbon"));
            assert_eq!(data.assigned_to.as_deref(), Some(""));
            assert!(data.specifications.is_none());
            Ok(sample_asset())
        });

        let data = UpdateAsset {
            brand: Some("   ".to_string()),
            location: Some("  Lab B  ".to_string()),
            model: Some("X1 Carbon\n".to_string()),
            assigned_to: Some(String::new()),
            ..Default::default()
        };
        assert!(service(assets, MockMaintenanceStore::new()).update(1, data).await.is_ok());
    }

    #[tokio::test]
    async fn delete_requires_admin() {
        let mut assets = MockAssetStore::new();
        assets.expect_delete().never();
        let service = service(assets, MockMaintenanceStore::new());

        let err = service.delete(&caller(2, Role::Technician), 1).await.unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn status_update_logs_repair_record() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut assets = MockAssetStore::new();
        assets.expect_set_status().times(1).returning(move |id, status, log| {
            assert_eq!(id, 1);
            assert_eq!(status, AssetStatus::Retired);
            assert_eq!(log.maintenance_type, MaintenanceType::Repair);
            assert_eq!(log.maintenance_date, today);
            assert_eq!(
                log.description.as_deref(),
                Some("Asset status changed to: Retired. Notes: screen cracked")
            );
            assert_eq!(log.performed_by.as_deref(), Some("User 2"));
            Ok(Asset { status, ..sample_asset() })
        });

        let request = UpdateAssetStatus {
            status: AssetStatus::Retired,
            notes: Some("screen cracked".to_string()),
        };
        let asset = service(assets, MockMaintenanceStore::new())
            .set_status(&caller(2, Role::Technician), 1, &request, today)
            .await
            .unwrap();

        assert_eq!(asset.status, AssetStatus::Retired);
    }

    #[tokio::test]
    async fn status_update_is_refused_to_plain_users() {
        let request = UpdateAssetStatus { status: AssetStatus::InUse, notes: None };
        let err = service(MockAssetStore::new(), MockMaintenanceStore::new())
            .set_status(&caller(3, Role::User), 1, &request, NaiveDate::MIN)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn details_include_history() {
        let mut assets = MockAssetStore::new();
        assets.expect_get_by_id().returning(|_| Ok(sample_asset()));
        let mut maintenance = MockMaintenanceStore::new();
        maintenance.expect_records().returning(|asset_id| {
            assert_eq!(asset_id, Some(1));
            let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
            Ok(vec![sample_record(1, 1, date, 75)])
        });

        let details = service(assets, maintenance)
            .details(1, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .await
            .unwrap();

        assert_eq!(details.maintenance_count, 1);
        assert_eq!(details.total_maintenance_cost, Decimal::new(75, 0));
    }

    #[tokio::test]
    async fn details_of_missing_asset() {
        let mut assets = MockAssetStore::new();
        assets
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Asset {} not found", id))));

        let err = service(assets, MockMaintenanceStore::new())
            .details(99, NaiveDate::MIN)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
