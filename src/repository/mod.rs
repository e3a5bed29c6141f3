//! Repository layer for database operations
//!
//! Each store is described by a trait so services can be exercised against
//! mocks; the Postgres implementations live in the submodules.

pub mod assets;
pub mod maintenance;
pub mod users;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        asset::{Asset, AssetQuery, CreateAsset, UpdateAsset},
        enums::{AssetStatus, Role},
        maintenance::{
            MaintenanceEntry, MaintenanceOutcome, MaintenanceQuery, MaintenanceRecord,
            MaintenanceStats, NewMaintenance, UpdateMaintenance,
        },
        user::{NewUser, User},
    },
};

/// Asset persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Filtered list, newest first
    async fn list(&self, query: &AssetQuery) -> AppResult<Vec<Asset>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Asset>;
    /// Whether a non-blank serial number is already used by another asset
    async fn serial_exists(&self, serial: &str, exclude_id: Option<i32>) -> AppResult<bool>;
    async fn create(&self, data: &CreateAsset) -> AppResult<Asset>;
    async fn update(&self, id: i32, data: &UpdateAsset) -> AppResult<Asset>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    /// Force a status and log the change as a maintenance record, atomically
    async fn set_status(&self, id: i32, status: AssetStatus, log: &NewMaintenance) -> AppResult<Asset>;
}

/// Maintenance log persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Filtered list joined with asset data, newest first
    async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceEntry>>;
    /// Raw records, optionally restricted to one asset, newest first
    async fn records(&self, asset_id: Option<i32>) -> AppResult<Vec<MaintenanceRecord>>;
    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRecord>;
    /// Insert a record and apply the status transition in one transaction
    async fn record(&self, data: &NewMaintenance) -> AppResult<MaintenanceOutcome>;
    async fn update(&self, id: i32, data: &UpdateMaintenance) -> AppResult<MaintenanceRecord>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    /// Counters; `upcoming_until` bounds the "due soon" window
    async fn stats(&self, upcoming_until: NaiveDate) -> AppResult<MaintenanceStats>;
}

/// User directory persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<User>>;
    async fn get_by_id(&self, id: i32) -> AppResult<User>;
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn username_exists(&self, username: &str) -> AppResult<bool>;
    async fn email_exists(&self, email: &str) -> AppResult<bool>;
    async fn create(&self, user: &NewUser) -> AppResult<User>;
    async fn count_by_role(&self) -> AppResult<Vec<(Role, i64)>>;
    /// Delete, re-checking the last-admin guard with admin rows locked
    async fn delete(&self, id: i32) -> AppResult<()>;
    /// Change role, re-checking the last-admin guard with admin rows locked
    async fn update_role(&self, id: i32, role: Role) -> AppResult<User>;
}

/// Store connectivity probe used by the readiness endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub assets: assets::AssetsRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            assets: assets::AssetsRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl StoreHealth for Repository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Turn a unique-constraint violation into a `Duplicate` error
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            return AppError::Duplicate(message.to_string());
        }
    }
    AppError::Database(err)
}

/// Escape LIKE wildcards and wrap the term for substring matching
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("x1"), "%x1%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
