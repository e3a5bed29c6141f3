//! Shared domain enums
//!
//! All of them are stored as snake_case text columns and travel over the wire
//! in the same form. `Display` gives the human label used in reports.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Implements string conversions and sqlx text encoding for a closed enum.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => ($slug:literal, $label:literal)),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
                match normalized.as_str() {
                    $($slug => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = sqlx::Decode::<sqlx::Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// AssetStatus
// ---------------------------------------------------------------------------

/// Asset lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Available,
    InUse,
    UnderMaintenance,
    Retired,
}

text_enum!(AssetStatus {
    Available => ("available", "Available"),
    InUse => ("in_use", "In Use"),
    UnderMaintenance => ("under_maintenance", "Under Maintenance"),
    Retired => ("retired", "Retired"),
});

impl Default for AssetStatus {
    fn default() -> Self {
        AssetStatus::Available
    }
}

// ---------------------------------------------------------------------------
// MaintenanceType
// ---------------------------------------------------------------------------

/// Kind of service event logged against an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    Routine,
    Repair,
    Upgrade,
}

text_enum!(MaintenanceType {
    Routine => ("routine", "Routine"),
    Repair => ("repair", "Repair"),
    Upgrade => ("upgrade", "Upgrade"),
});

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User permission tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Technician,
    User,
}

text_enum!(Role {
    Admin => ("admin", "Admin"),
    Technician => ("technician", "Technician"),
    User => ("user", "User"),
});

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}
