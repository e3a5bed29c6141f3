//! Business logic services

pub mod assets;
pub mod maintenance;
pub mod reports;
pub mod users;

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    config::UsersConfig,
    error::{AppError, AppResult},
    repository::{AssetStore, MaintenanceStore, Repository, StoreHealth, UserStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub assets: assets::AssetsService,
    pub maintenance: maintenance::MaintenanceService,
    pub users: users::UsersService,
    pub reports: reports::ReportsService,
    pub health: Arc<dyn StoreHealth>,
}

impl Services {
    /// Create all services backed by the Postgres repository
    pub fn new(repository: Repository, users_config: UsersConfig) -> Self {
        Self::from_stores(
            Arc::new(repository.assets.clone()),
            Arc::new(repository.maintenance.clone()),
            Arc::new(repository.users.clone()),
            Arc::new(repository),
            users_config,
        )
    }

    /// Wire services over arbitrary store implementations
    pub fn from_stores(
        assets: Arc<dyn AssetStore>,
        maintenance: Arc<dyn MaintenanceStore>,
        users: Arc<dyn UserStore>,
        health: Arc<dyn StoreHealth>,
        users_config: UsersConfig,
    ) -> Self {
        Self {
            assets: assets::AssetsService::new(assets.clone(), maintenance.clone()),
            maintenance: maintenance::MaintenanceService::new(maintenance.clone()),
            users: users::UsersService::new(users.clone(), users_config),
            reports: reports::ReportsService::new(assets, maintenance, users),
            health,
        }
    }
}

/// Trim optional text, mapping blank values to `None`
pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim optional text for a partial update; `Some("")` is kept and clears the column
pub(crate) fn trim_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Reject negative money amounts
pub(crate) fn check_amount(amount: Option<Decimal>, field: &str) -> AppResult<()> {
    match amount {
        Some(a) if a < Decimal::ZERO => {
            Err(AppError::Validation(format!("{} cannot be negative", field)))
        }
        _ => Ok(()),
    }
}
