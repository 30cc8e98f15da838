//! Startup repair of legacy records.
//!
//! The stored shape evolved over time (the purchase flag and the active
//! marker arrived late) and older builds could leave broken odometer links
//! behind. `migrate_vehicles` runs once per process, ahead of any other
//! repository call, and repairs structure without ever deleting user data.
use std::collections::HashMap;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};
use serde::{Deserialize, Serialize};

use crate::{
    ResultRepo, fuel_usages, maintenance as maintenance_entity, mileage,
    vehicles as vehicle_entity,
};

use super::{VehicleRepository, with_tx};

/// What a repair run actually touched. A second run right after a first one
/// reports all zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    pub nullified_fuel_links: u64,
    pub nullified_maintenance_links: u64,
    pub purchase_flags_backfilled: u64,
    pub active_flags_fixed: u64,
}

impl RepairReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl VehicleRepository {
    /// Repair legacy records so the current invariants hold. Idempotent, a
    /// no-op on an empty store, and it only repairs links and flags:
    /// user-entered records are never deleted.
    pub async fn migrate_vehicles(&self) -> ResultRepo<RepairReport> {
        with_tx!(self, |db_tx| {
            let mut report = RepairReport::default();

            let owners: HashMap<String, String> = mileage::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|m| (m.id, m.vehicle_id))
                .collect();

            // Fill-ups know their vehicle only through the anchor reading, so
            // a dangling link is the only corruption possible here.
            let fills = fuel_usages::Entity::find()
                .filter(fuel_usages::Column::MileageId.is_not_null())
                .all(&db_tx)
                .await?;
            for fill in fills {
                let Some(anchor_id) = fill.mileage_id else {
                    continue;
                };
                if owners.contains_key(&anchor_id) {
                    continue;
                }
                tracing::warn!(fill = %fill.id, "nullifying dangling odometer link on fill-up");
                let model = fuel_usages::ActiveModel {
                    id: ActiveValue::Set(fill.id),
                    mileage_id: ActiveValue::Set(None),
                    ..Default::default()
                };
                model.update(&db_tx).await?;
                report.nullified_fuel_links += 1;
            }

            // Maintenance events carry both references, so the link can also
            // point at a reading owned by another vehicle.
            let events = maintenance_entity::Entity::find()
                .filter(maintenance_entity::Column::MileageId.is_not_null())
                .all(&db_tx)
                .await?;
            for event in events {
                let Some(reference) = event.mileage_id else {
                    continue;
                };
                match owners.get(&reference) {
                    Some(owner) if *owner == event.vehicle_id => continue,
                    Some(_) => {
                        tracing::warn!(
                            event = %event.id,
                            "nullifying odometer link owned by another vehicle"
                        );
                    }
                    None => {
                        tracing::warn!(event = %event.id, "nullifying dangling odometer link");
                    }
                }
                let model = maintenance_entity::ActiveModel {
                    id: ActiveValue::Set(event.id),
                    mileage_id: ActiveValue::Set(None),
                    ..Default::default()
                };
                model.update(&db_tx).await?;
                report.nullified_maintenance_links += 1;
            }

            // Rows predating the purchase flag behave as purchased.
            let backfilled = vehicle_entity::Entity::update_many()
                .col_expr(vehicle_entity::Column::IsPurchased, Expr::value(true))
                .filter(vehicle_entity::Column::IsPurchased.is_null())
                .exec(&db_tx)
                .await?;
            report.purchase_flags_backfilled = backfilled.rows_affected;

            report.active_flags_fixed = repair_active_flags(&db_tx).await?;

            if !report.is_clean() {
                tracing::info!(?report, "vehicle store repaired");
            }
            Ok(report)
        })
    }
}

/// Restore the single-active invariant: no active vehicle means the most
/// recently created one becomes active; several active vehicles keep only the
/// most recently updated one (id as the deterministic tie-break).
async fn repair_active_flags(db_tx: &DatabaseTransaction) -> ResultRepo<u64> {
    let vehicles = vehicle_entity::Entity::find().all(db_tx).await?;
    if vehicles.is_empty() {
        return Ok(0);
    }

    let mut active: Vec<&vehicle_entity::Model> =
        vehicles.iter().filter(|v| v.is_active).collect();

    if active.is_empty() {
        let newest = vehicles
            .iter()
            .max_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        if let Some(newest) = newest {
            tracing::info!(vehicle = %newest.id, "no active vehicle, activating the newest");
            let model = vehicle_entity::ActiveModel {
                id: ActiveValue::Set(newest.id.clone()),
                is_active: ActiveValue::Set(true),
                ..Default::default()
            };
            model.update(db_tx).await?;
            return Ok(1);
        }
        return Ok(0);
    }

    if active.len() == 1 {
        return Ok(0);
    }

    active.sort_by(|a, b| (b.updated_at, &b.id).cmp(&(a.updated_at, &a.id)));
    let mut fixed = 0;
    for stale in &active[1..] {
        tracing::warn!(vehicle = %stale.id, "deactivating extra active vehicle");
        let model = vehicle_entity::ActiveModel {
            id: ActiveValue::Set(stale.id.clone()),
            is_active: ActiveValue::Set(false),
            ..Default::default()
        };
        model.update(db_tx).await?;
        fixed += 1;
    }
    Ok(fixed)
}
