//! Data models for Labinv

pub mod asset;
pub mod enums;
pub mod maintenance;
pub mod report;
pub mod user;

// Re-export commonly used types
pub use asset::{Asset, AssetDetails, AssetQuery};
pub use enums::{AssetStatus, MaintenanceType, Role};
pub use maintenance::{MaintenanceEntry, MaintenanceQuery, MaintenanceRecord};
pub use user::{Caller, User};
