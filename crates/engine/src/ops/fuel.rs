use chrono::NaiveDateTime;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{FuelUsage, Mileage, RepositoryError, ResultRepo, fuel_usages, mileage};

use super::{VehicleRepository, require_active_vehicle, with_tx};

fn validate_fill(liters: f64, cost: f64, mileage_value: i64) -> ResultRepo<()> {
    if !liters.is_finite() || liters <= 0.0 {
        return Err(RepositoryError::InvalidValue(
            "liters must be > 0".to_string(),
        ));
    }
    if !cost.is_finite() || cost < 0.0 {
        return Err(RepositoryError::InvalidValue(
            "cost must be >= 0".to_string(),
        ));
    }
    if mileage_value < 0 {
        return Err(RepositoryError::InvalidValue(
            "mileage must be >= 0".to_string(),
        ));
    }
    Ok(())
}

/// Resolve a fill-up owned by the given vehicle, together with its anchor
/// reading. Ownership runs through the anchor: a fill-up whose link was
/// nullified no longer resolves.
async fn owned_fill<C: ConnectionTrait>(
    conn: &C,
    id: &str,
    vehicle_id: &str,
) -> ResultRepo<(fuel_usages::Model, mileage::Model)> {
    let not_found = || RepositoryError::NotFound("fuel usage".to_string());

    let fill = fuel_usages::Entity::find_by_id(id.to_string())
        .one(conn)
        .await?
        .ok_or_else(not_found)?;
    let anchor_id = fill.mileage_id.clone().ok_or_else(not_found)?;
    let anchor = mileage::Entity::find_by_id(anchor_id)
        .one(conn)
        .await?
        .ok_or_else(not_found)?;
    if anchor.vehicle_id != vehicle_id {
        return Err(not_found());
    }
    Ok((fill, anchor))
}

impl VehicleRepository {
    /// Record a fill-up for the active vehicle: a new odometer reading plus
    /// the fuel usage anchored to it, inserted as one atomic unit.
    pub async fn save_fuel_usage(
        &self,
        liters: f64,
        cost: f64,
        mileage_value: i64,
        date: NaiveDateTime,
    ) -> ResultRepo<FuelUsage> {
        validate_fill(liters, cost, mileage_value)?;

        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;

            // Monotonicity is a soft invariant: warn, never reject.
            let latest = mileage::Entity::find()
                .filter(mileage::Column::VehicleId.eq(vehicle.id.clone()))
                .order_by_desc(mileage::Column::Date)
                .one(&db_tx)
                .await?;
            if let Some(latest) = latest
                && latest.value > mileage_value
            {
                tracing::warn!(
                    vehicle = %vehicle.id,
                    previous = latest.value,
                    new = mileage_value,
                    "odometer value lower than the latest recorded reading"
                );
            }

            let reading = Mileage::new(mileage_value, date, vehicle.id);
            let fill = FuelUsage::new(liters, cost, date, reading.id.clone());

            mileage::ActiveModel::from(&reading).insert(&db_tx).await?;
            fuel_usages::ActiveModel::from(&fill).insert(&db_tx).await?;

            Ok(fill)
        })
    }

    /// Point lookup of a fill-up owned by the active vehicle.
    pub async fn get_fuel_usage(&self, id: &str) -> ResultRepo<FuelUsage> {
        let vehicle = require_active_vehicle(&self.database).await?;
        let (fill, _) = owned_fill(&self.database, id, &vehicle.id).await?;
        Ok(FuelUsage::from(fill))
    }

    /// Update a fill-up and its anchor reading atomically.
    pub async fn update_fuel_usage(
        &self,
        id: &str,
        liters: f64,
        cost: f64,
        mileage_value: i64,
    ) -> ResultRepo<FuelUsage> {
        validate_fill(liters, cost, mileage_value)?;

        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;
            let (fill, anchor) = owned_fill(&db_tx, id, &vehicle.id).await?;

            let fill_model = fuel_usages::ActiveModel {
                id: ActiveValue::Set(fill.id.clone()),
                liters: ActiveValue::Set(liters),
                cost: ActiveValue::Set(cost),
                ..Default::default()
            };
            let updated = fill_model.update(&db_tx).await?;

            let anchor_model = mileage::ActiveModel {
                id: ActiveValue::Set(anchor.id),
                value: ActiveValue::Set(mileage_value),
                ..Default::default()
            };
            anchor_model.update(&db_tx).await?;

            Ok(FuelUsage::from(updated))
        })
    }

    /// Mark a fill-up as partial (or full again).
    pub async fn update_fuel_usage_partial_fill_status(
        &self,
        id: &str,
        is_partial_fill: bool,
    ) -> ResultRepo<()> {
        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;
            let (fill, _) = owned_fill(&db_tx, id, &vehicle.id).await?;

            let model = fuel_usages::ActiveModel {
                id: ActiveValue::Set(fill.id),
                is_partial_fill: ActiveValue::Set(is_partial_fill),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete a fill-up together with its anchor reading; the reading exists
    /// only to locate this fill-up.
    pub async fn delete_fuel_usage(&self, fuel_usage: &FuelUsage) -> ResultRepo<()> {
        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;
            let (fill, anchor) = owned_fill(&db_tx, &fuel_usage.id, &vehicle.id).await?;

            fuel_usages::Entity::delete_by_id(fill.id)
                .exec(&db_tx)
                .await?;
            mileage::Entity::delete_by_id(anchor.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete every fill-up of the active vehicle along with the anchor
    /// readings, leaving the rest of the odometer history untouched.
    pub async fn reset_fuel_usage(&self) -> ResultRepo<()> {
        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;

            let reading_ids: Vec<String> = mileage::Entity::find()
                .filter(mileage::Column::VehicleId.eq(vehicle.id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect();
            if reading_ids.is_empty() {
                return Ok(());
            }

            let fills = fuel_usages::Entity::find()
                .filter(fuel_usages::Column::MileageId.is_in(reading_ids))
                .all(&db_tx)
                .await?;
            if fills.is_empty() {
                return Ok(());
            }

            let anchor_ids: Vec<String> = fills.iter().filter_map(|f| f.mileage_id.clone()).collect();
            let fill_ids: Vec<String> = fills.into_iter().map(|f| f.id).collect();

            fuel_usages::Entity::delete_many()
                .filter(fuel_usages::Column::Id.is_in(fill_ids))
                .exec(&db_tx)
                .await?;
            mileage::Entity::delete_many()
                .filter(mileage::Column::Id.is_in(anchor_ids))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
