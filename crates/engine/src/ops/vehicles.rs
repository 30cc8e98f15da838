use chrono::{Local, NaiveDateTime};
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    FuelUsage, Maintenance, Mileage, RepositoryError, ResultRepo, Vehicle, fuel_usages, maintenance,
    mileage, vehicles as vehicle_entity,
};

use super::{VehicleRepository, active_vehicle_model, normalize_required_name, require_active_vehicle, with_tx};

impl VehicleRepository {
    /// Return the active vehicle with its odometer readings, fill-ups and
    /// maintenance events loaded, or `None` when no vehicle is active.
    pub async fn load_active_vehicle(&self) -> ResultRepo<Option<Vehicle>> {
        let Some(model) = active_vehicle_model(&self.database).await? else {
            return Ok(None);
        };
        Ok(Some(self.load_children(model).await?))
    }

    /// Re-read the active vehicle from the store. Same contract as
    /// [`load_active_vehicle`], for use after an external mutation.
    ///
    /// [`load_active_vehicle`]: VehicleRepository::load_active_vehicle
    pub async fn refresh_active_vehicle(&self) -> ResultRepo<Option<Vehicle>> {
        self.load_active_vehicle().await
    }

    pub(crate) async fn load_children(&self, model: vehicle_entity::Model) -> ResultRepo<Vehicle> {
        let mut vehicle = Vehicle::from(model);

        vehicle.mileage = mileage::Entity::find()
            .filter(mileage::Column::VehicleId.eq(vehicle.id.clone()))
            .order_by_asc(mileage::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Mileage::from)
            .collect();

        // Fill-ups reference the vehicle only through their anchor reading.
        let mileage_ids: Vec<String> = vehicle.mileage.iter().map(|m| m.id.clone()).collect();
        vehicle.fuel_usages = if mileage_ids.is_empty() {
            Vec::new()
        } else {
            fuel_usages::Entity::find()
                .filter(fuel_usages::Column::MileageId.is_in(mileage_ids))
                .order_by_asc(fuel_usages::Column::Date)
                .all(&self.database)
                .await?
                .into_iter()
                .map(FuelUsage::from)
                .collect()
        };

        vehicle.maintenance = maintenance::Entity::find()
            .filter(maintenance::Column::VehicleId.eq(vehicle.id.clone()))
            .order_by_asc(maintenance::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Maintenance::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(vehicle)
    }

    /// Create a vehicle together with its initial odometer reading, as one
    /// atomic unit, and make it the active vehicle. Any previously active
    /// vehicle is deactivated in the same transaction.
    pub async fn save_vehicle(
        &self,
        name: &str,
        purchase_date: NaiveDateTime,
        initial_mileage: i64,
    ) -> ResultRepo<Vehicle> {
        let name = normalize_required_name(name, "vehicle")?;
        if initial_mileage < 0 {
            return Err(RepositoryError::InvalidValue(
                "initial mileage must be >= 0".to_string(),
            ));
        }

        let now = Local::now().naive_local();
        let mut vehicle = Vehicle::new(name, purchase_date, now);
        let reading = Mileage::new(initial_mileage, now, vehicle.id.clone());

        with_tx!(self, |db_tx| {
            vehicle_entity::Entity::update_many()
                .col_expr(vehicle_entity::Column::IsActive, Expr::value(false))
                .filter(vehicle_entity::Column::IsActive.eq(true))
                .exec(&db_tx)
                .await?;

            vehicle_entity::ActiveModel::from(&vehicle)
                .insert(&db_tx)
                .await?;
            mileage::ActiveModel::from(&reading).insert(&db_tx).await?;

            vehicle.mileage.push(reading);
            Ok(vehicle)
        })
    }

    /// Persist field changes to an existing vehicle. The active marker is not
    /// touched here; activation happens through [`save_vehicle`].
    ///
    /// [`save_vehicle`]: VehicleRepository::save_vehicle
    pub async fn update_vehicle(&self, vehicle: &Vehicle) -> ResultRepo<()> {
        let name = normalize_required_name(&vehicle.name, "vehicle")?;

        with_tx!(self, |db_tx| {
            vehicle_entity::Entity::find_by_id(vehicle.id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| RepositoryError::NotFound("vehicle".to_string()))?;

            let model = vehicle_entity::ActiveModel {
                id: ActiveValue::Set(vehicle.id.clone()),
                name: ActiveValue::Set(name),
                purchase_date: ActiveValue::Set(vehicle.purchase_date),
                is_purchased: ActiveValue::Set(Some(vehicle.is_purchased)),
                updated_at: ActiveValue::Set(Local::now().naive_local()),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete the active vehicle and everything hanging off it.
    ///
    /// Fill-ups reference their anchor reading rather than the vehicle, so
    /// they are deleted explicitly before the readings to avoid dangling
    /// rows; readings and maintenance then cascade with the vehicle.
    pub async fn delete_vehicle(&self) -> ResultRepo<()> {
        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;
            let backend = self.database.get_database_backend();

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM fuel_usages WHERE mileage_id IN \
                     (SELECT id FROM mileage WHERE vehicle_id = ?);",
                    vec![vehicle.id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM mileage WHERE vehicle_id = ?;",
                    vec![vehicle.id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM maintenance WHERE vehicle_id = ?;",
                    vec![vehicle.id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM vehicles WHERE id = ?;",
                    vec![vehicle.id.into()],
                ))
                .await?;

            Ok(())
        })
    }

    /// Flip the purchased flag on the active vehicle.
    pub async fn update_vehicle_purchase_status(&self, is_purchased: bool) -> ResultRepo<()> {
        with_tx!(self, |db_tx| {
            let vehicle = require_active_vehicle(&db_tx).await?;
            let model = vehicle_entity::ActiveModel {
                id: ActiveValue::Set(vehicle.id),
                is_purchased: ActiveValue::Set(Some(is_purchased)),
                updated_at: ActiveValue::Set(Local::now().naive_local()),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            Ok(())
        })
    }
}
