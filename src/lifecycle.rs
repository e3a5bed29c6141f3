//! Asset status transitions driven by maintenance events
//!
//! Logging maintenance may move an asset between lifecycle states. The rule
//! is evaluated with the asset row locked, inside the same transaction that
//! inserts the maintenance record.

use crate::models::enums::{AssetStatus, MaintenanceType};

/// Status an asset takes after a maintenance event.
///
/// Priority order:
/// 1. an explicit `requested` status wins;
/// 2. a repair puts the asset under maintenance;
/// 3. a routine check on an asset under maintenance makes it available again;
/// 4. anything else leaves the status unchanged.
///
/// Upgrades never clear `UnderMaintenance`.
pub fn next_status(
    current: AssetStatus,
    kind: MaintenanceType,
    requested: Option<AssetStatus>,
) -> AssetStatus {
    if let Some(status) = requested {
        return status;
    }

    match (kind, current) {
        (MaintenanceType::Repair, _) => AssetStatus::UnderMaintenance,
        (MaintenanceType::Routine, AssetStatus::UnderMaintenance) => AssetStatus::Available,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_puts_asset_under_maintenance() {
        assert_eq!(
            next_status(AssetStatus::Available, MaintenanceType::Repair, None),
            AssetStatus::UnderMaintenance
        );
        assert_eq!(
            next_status(AssetStatus::Retired, MaintenanceType::Repair, None),
            AssetStatus::UnderMaintenance
        );
    }

    #[test]
    fn routine_releases_asset_under_maintenance() {
        assert_eq!(
            next_status(AssetStatus::UnderMaintenance, MaintenanceType::Routine, None),
            AssetStatus::Available
        );
    }

    #[test]
    fn routine_on_other_states_is_a_no_op() {
        for current in [AssetStatus::Available, AssetStatus::InUse, AssetStatus::Retired] {
            assert_eq!(next_status(current, MaintenanceType::Routine, None), current);
        }
    }

    #[test]
    fn upgrade_never_changes_status() {
        for current in AssetStatus::ALL.iter().copied() {
            assert_eq!(next_status(current, MaintenanceType::Upgrade, None), current);
        }
    }

    #[test]
    fn explicit_status_wins_over_maintenance_type() {
        assert_eq!(
            next_status(AssetStatus::Available, MaintenanceType::Repair, Some(AssetStatus::InUse)),
            AssetStatus::InUse
        );
        assert_eq!(
            next_status(
                AssetStatus::UnderMaintenance,
                MaintenanceType::Routine,
                Some(AssetStatus::Retired)
            ),
            AssetStatus::Retired
        );
    }

    #[test]
    fn repair_then_routine_round_trip() {
        let after_repair = next_status(AssetStatus::Available, MaintenanceType::Repair, None);
        let after_routine = next_status(after_repair, MaintenanceType::Routine, None);
        assert_eq!(after_repair, AssetStatus::UnderMaintenance);
        assert_eq!(after_routine, AssetStatus::Available);
    }
}
