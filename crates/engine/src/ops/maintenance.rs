use chrono::NaiveDateTime;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Maintenance, MaintenanceKind, RepositoryError, ResultRepo, maintenance as maintenance_entity,
    mileage,
};

use super::{VehicleRepository, require_active_vehicle, with_tx};

impl VehicleRepository {
    /// Record a maintenance event for the active vehicle.
    ///
    /// A supplied odometer reference must belong to the active vehicle; the
    /// cost is validated even for free work so a later flag flip cannot
    /// surface a negative amount.
    pub async fn save_maintenance(
        &self,
        kind: MaintenanceKind,
        cost: f64,
        is_free: bool,
        date: NaiveDateTime,
        notes: Option<String>,
        mileage_id: Option<String>,
    ) -> ResultRepo<Maintenance> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(RepositoryError::InvalidValue(
                "cost must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;

            if let Some(ref reference) = mileage_id {
                let reading = mileage::Entity::find_by_id(reference.clone())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| RepositoryError::NotFound("mileage".to_string()))?;
                if reading.vehicle_id != vehicle.id {
                    return Err(RepositoryError::NotFound("mileage".to_string()));
                }
            }

            let event = Maintenance::new(kind, cost, is_free, date, notes, mileage_id, vehicle.id);
            maintenance_entity::ActiveModel::from(&event)
                .insert(&db_tx)
                .await?;
            Ok(event)
        })
    }

    /// Delete one maintenance event of the active vehicle.
    pub async fn delete_maintenance(&self, maintenance: &Maintenance) -> ResultRepo<()> {
        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;

            let event = maintenance_entity::Entity::find_by_id(maintenance.id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| RepositoryError::NotFound("maintenance".to_string()))?;
            if event.vehicle_id != vehicle.id {
                return Err(RepositoryError::NotFound("maintenance".to_string()));
            }

            maintenance_entity::Entity::delete_by_id(event.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Delete every maintenance event of the active vehicle. Odometer history
    /// stays untouched, including readings maintenance events pointed at.
    pub async fn reset_maintenance(&self) -> ResultRepo<()> {
        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;
            maintenance_entity::Entity::delete_many()
                .filter(maintenance_entity::Column::VehicleId.eq(vehicle.id))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
