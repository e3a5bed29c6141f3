//! Fixtures shared by unit tests

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{
    asset::Asset,
    enums::{AssetStatus, MaintenanceType, Role},
    maintenance::MaintenanceRecord,
    user::{Caller, User},
};

pub fn sample_asset() -> Asset {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    Asset {
        id: 1,
        name: "ThinkPad X1".to_string(),
        asset_type: "Laptop".to_string(),
        serial_number: Some("SN123".to_string()),
        brand: Some("Lenovo".to_string()),
        model: Some("X1 Carbon".to_string()),
        specifications: None,
        purchase_date: NaiveDate::from_ymd_opt(2022, 3, 15),
        purchase_price: Decimal::new(2000, 0),
        current_value: Decimal::new(1500, 0),
        status: AssetStatus::Available,
        location: Some("Lab A".to_string()),
        assigned_to: None,
        last_maintenance: None,
        next_maintenance: None,
        created_at: created,
        updated_at: created,
    }
}

/// Asset with the given id, type, status and current value
pub fn asset_with(id: i32, asset_type: &str, status: AssetStatus, value: i64) -> Asset {
    Asset {
        id,
        name: format!("{} {}", asset_type, id),
        asset_type: asset_type.to_string(),
        serial_number: None,
        status,
        current_value: Decimal::new(value, 0),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + chrono::Duration::days(id as i64),
        ..sample_asset()
    }
}

pub fn sample_record(id: i32, asset_id: i32, date: NaiveDate, cost: i64) -> MaintenanceRecord {
    MaintenanceRecord {
        id,
        asset_id,
        maintenance_date: date,
        maintenance_type: MaintenanceType::Routine,
        description: None,
        cost: Decimal::new(cost, 0),
        performed_by: None,
        next_maintenance_date: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + chrono::Duration::minutes(id as i64),
    }
}

pub fn sample_user(id: i32, role: Role) -> User {
    User {
        id,
        username: format!("user{}", id),
        password_hash: String::new(),
        full_name: format!("User {}", id),
        email: None,
        role,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    }
}

pub fn caller(id: i32, role: Role) -> Caller {
    Caller {
        user_id: id,
        username: format!("user{}", id),
        full_name: format!("User {}", id),
        role,
    }
}
