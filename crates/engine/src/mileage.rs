//! The module contains the `Mileage` type, one odometer reading of the
//! tracked vehicle.
//!
//! Readings are ordered by date. A later reading is expected to carry a value
//! greater than or equal to any earlier one, but the repository only warns on
//! violations: real odometers get reset or misentered.
use chrono::NaiveDateTime;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An odometer reading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mileage {
    pub id: String,
    pub value: i64,
    pub date: NaiveDateTime,
    pub vehicle_id: String,
}

impl Mileage {
    pub fn new(value: i64, date: NaiveDateTime, vehicle_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            value,
            date,
            vehicle_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mileage")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub value: i64,
    pub date: NaiveDateTime,
    pub vehicle_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicles::Entity",
        from = "Column::VehicleId",
        to = "super::vehicles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Vehicles,
    #[sea_orm(has_many = "super::fuel_usages::Entity")]
    FuelUsages,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::fuel_usages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FuelUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Mileage> for ActiveModel {
    fn from(mileage: &Mileage) -> Self {
        Self {
            id: ActiveValue::Set(mileage.id.clone()),
            value: ActiveValue::Set(mileage.value),
            date: ActiveValue::Set(mileage.date),
            vehicle_id: ActiveValue::Set(mileage.vehicle_id.clone()),
        }
    }
}

impl From<Model> for Mileage {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            value: model.value,
            date: model.date,
            vehicle_id: model.vehicle_id,
        }
    }
}
