//! Maintenance log service

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{
            CreateMaintenance, MaintenanceEntry, MaintenanceOutcome, MaintenanceQuery,
            MaintenanceRecord, MaintenanceStats, NewMaintenance, UpdateMaintenance,
        },
        user::Caller,
    },
    repository::MaintenanceStore,
};

use super::{blank_to_none, check_amount, trim_text};

/// Window used for the "maintenance due soon" counter
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

#[derive(Clone)]
pub struct MaintenanceService {
    store: Arc<dyn MaintenanceStore>,
}

impl MaintenanceService {
    pub fn new(store: Arc<dyn MaintenanceStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceEntry>> {
        self.store.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRecord> {
        self.store.get_by_id(id).await
    }

    /// Log a maintenance event and move the asset through its lifecycle
    pub async fn record(&self, data: CreateMaintenance) -> AppResult<MaintenanceOutcome> {
        let data = validate_submission(data)?;
        let outcome = self.store.record(&data).await?;

        if outcome.status_changed() {
            tracing::info!(
                "Maintenance {} logged for asset {}: status {} -> {}",
                outcome.record.id,
                outcome.record.asset_id,
                outcome.previous_status.as_str(),
                outcome.new_status.as_str()
            );
        } else {
            tracing::info!(
                "Maintenance {} logged for asset {}",
                outcome.record.id,
                outcome.record.asset_id
            );
        }
        Ok(outcome)
    }

    /// Edit a record; the asset status is left as is
    pub async fn update(
        &self,
        caller: &Caller,
        id: i32,
        data: UpdateMaintenance,
    ) -> AppResult<MaintenanceRecord> {
        caller.require_technician()?;
        data.validate()?;
        check_amount(data.cost, "Cost")?;
        let data = UpdateMaintenance {
            description: trim_text(data.description),
            performed_by: trim_text(data.performed_by),
            ..data
        };

        let record = self.store.update(id, &data).await?;
        tracing::info!("Maintenance record {} updated by {}", id, caller.username);
        Ok(record)
    }

    pub async fn delete(&self, caller: &Caller, id: i32) -> AppResult<()> {
        caller.require_admin()?;
        self.store.delete(id).await?;
        tracing::info!("Maintenance record {} deleted by {}", id, caller.username);
        Ok(())
    }

    pub async fn stats(&self, today: NaiveDate) -> AppResult<MaintenanceStats> {
        self.store.stats(today + Duration::days(UPCOMING_WINDOW_DAYS)).await
    }
}

fn validate_submission(data: CreateMaintenance) -> AppResult<NewMaintenance> {
    data.validate()?;

    let asset_id = data
        .asset_id
        .ok_or_else(|| AppError::Validation("Please select an asset".to_string()))?;
    let maintenance_date = data
        .maintenance_date
        .ok_or_else(|| AppError::Validation("Maintenance date is required".to_string()))?;
    let maintenance_type = data
        .maintenance_type
        .ok_or_else(|| AppError::Validation("Maintenance type is required".to_string()))?;
    check_amount(data.cost, "Cost")?;

    Ok(NewMaintenance {
        asset_id,
        maintenance_date,
        maintenance_type,
        description: blank_to_none(data.description),
        cost: data.cost.unwrap_or(Decimal::ZERO),
        performed_by: blank_to_none(data.performed_by),
        next_maintenance_date: data.next_maintenance_date,
        new_asset_status: data.new_asset_status,
    })
}
