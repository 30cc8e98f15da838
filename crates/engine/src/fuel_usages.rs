//! The module contains the `FuelUsage` type, a single fill-up at the pump.
//!
//! A fill-up references the odometer reading taken at the pump (its anchor).
//! Deleting the fill-up deletes that anchor reading too, since it exists only
//! to locate the fill-up on the odometer history. The reference is nullable
//! because the startup repair drops dangling links instead of deleting the
//! record.
use chrono::NaiveDateTime;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fuel fill-up.
///
/// `liters` is strictly positive, `cost` non-negative in the currency the
/// settings declare. A partial fill did not top off the tank, which makes the
/// fuel-per-distance ratio around it unreliable: it still counts toward
/// totals but is excluded from average-consumption pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelUsage {
    pub id: String,
    pub liters: f64,
    pub cost: f64,
    pub date: NaiveDateTime,
    pub is_partial_fill: bool,
    pub mileage_id: Option<String>,
}

impl FuelUsage {
    pub fn new(liters: f64, cost: f64, date: NaiveDateTime, mileage_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            liters,
            cost,
            date,
            is_partial_fill: false,
            mileage_id: Some(mileage_id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fuel_usages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "Double")]
    pub liters: f64,
    #[sea_orm(column_type = "Double")]
    pub cost: f64,
    pub date: NaiveDateTime,
    pub is_partial_fill: bool,
    pub mileage_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mileage::Entity",
        from = "Column::MileageId",
        to = "super::mileage::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Mileage,
}

impl Related<super::mileage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mileage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FuelUsage> for ActiveModel {
    fn from(fuel: &FuelUsage) -> Self {
        Self {
            id: ActiveValue::Set(fuel.id.clone()),
            liters: ActiveValue::Set(fuel.liters),
            cost: ActiveValue::Set(fuel.cost),
            date: ActiveValue::Set(fuel.date),
            is_partial_fill: ActiveValue::Set(fuel.is_partial_fill),
            mileage_id: ActiveValue::Set(fuel.mileage_id.clone()),
        }
    }
}

impl From<Model> for FuelUsage {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            liters: model.liters,
            cost: model.cost,
            date: model.date,
            is_partial_fill: model.is_partial_fill,
            mileage_id: model.mileage_id,
        }
    }
}
