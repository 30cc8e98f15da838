use sea_orm::{ConnectionTrait, DatabaseConnection, QueryFilter, prelude::*};

use crate::RepositoryError;
use crate::ResultRepo;
use crate::vehicles as vehicle_entity;

mod fuel;
mod maintenance;
mod repair;
mod stats;
mod vehicles;

pub use repair::RepairReport;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The single writer of vehicle-domain state.
///
/// Every mutation of vehicles, odometer readings, fill-ups, and maintenance
/// events goes through this type; composite writes happen inside one DB
/// transaction so the store never ends up half updated. The host serializes
/// access to the connection, so there is no internal locking.
#[derive(Debug)]
pub struct VehicleRepository {
    database: DatabaseConnection,
}

impl VehicleRepository {
    /// Return a builder for `VehicleRepository`. Help to build the struct.
    pub fn builder() -> VehicleRepositoryBuilder {
        VehicleRepositoryBuilder::default()
    }
}

/// Fetch the active vehicle row, if any.
pub(crate) async fn active_vehicle_model<C: ConnectionTrait>(
    conn: &C,
) -> ResultRepo<Option<vehicle_entity::Model>> {
    Ok(vehicle_entity::Entity::find()
        .filter(vehicle_entity::Column::IsActive.eq(true))
        .one(conn)
        .await?)
}

/// Fetch the active vehicle row or fail with [`RepositoryError::NoActiveVehicle`].
pub(crate) async fn require_active_vehicle<C: ConnectionTrait>(
    conn: &C,
) -> ResultRepo<vehicle_entity::Model> {
    active_vehicle_model(conn)
        .await?
        .ok_or(RepositoryError::NoActiveVehicle)
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultRepo<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::InvalidValue(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `VehicleRepository`
#[derive(Default)]
pub struct VehicleRepositoryBuilder {
    database: DatabaseConnection,
}

impl VehicleRepositoryBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> VehicleRepositoryBuilder {
        self.database = db;
        self
    }

    /// Construct `VehicleRepository`
    pub fn build(self) -> VehicleRepository {
        VehicleRepository {
            database: self.database,
        }
    }
}
