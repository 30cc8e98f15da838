//! The module contains the representation of the tracked vehicle.
//!
//! At most one vehicle is marked active at any time; every fuel and
//! maintenance operation implicitly targets it. A vehicle owns its odometer
//! readings and maintenance events (deleting the vehicle deletes them), while
//! fuel fill-ups hang off their anchor odometer reading.
use chrono::NaiveDateTime;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FuelUsage, Maintenance, Mileage};

/// A tracked vehicle with its loaded children.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub purchase_date: NaiveDateTime,
    pub is_purchased: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub mileage: Vec<Mileage>,
    pub fuel_usages: Vec<FuelUsage>,
    pub maintenance: Vec<Maintenance>,
}

impl Vehicle {
    pub fn new(name: String, purchase_date: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            purchase_date,
            is_purchased: true,
            is_active: true,
            created_at: now,
            updated_at: now,
            mileage: Vec::new(),
            fuel_usages: Vec::new(),
            maintenance: Vec::new(),
        }
    }

    /// Latest odometer reading by date, if any.
    #[must_use]
    pub fn latest_mileage(&self) -> Option<&Mileage> {
        self.mileage.iter().max_by_key(|m| (m.date, m.value))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub purchase_date: NaiveDateTime,
    /// Nullable: rows created before the purchase flag existed carry NULL
    /// until the startup repair backfills them.
    pub is_purchased: Option<bool>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mileage::Entity")]
    Mileage,
    #[sea_orm(has_many = "super::maintenance::Entity")]
    Maintenance,
}

impl Related<super::mileage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mileage.def()
    }
}

impl Related<super::maintenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Maintenance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Vehicle> for ActiveModel {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: ActiveValue::Set(vehicle.id.clone()),
            name: ActiveValue::Set(vehicle.name.clone()),
            purchase_date: ActiveValue::Set(vehicle.purchase_date),
            is_purchased: ActiveValue::Set(Some(vehicle.is_purchased)),
            is_active: ActiveValue::Set(vehicle.is_active),
            created_at: ActiveValue::Set(vehicle.created_at),
            updated_at: ActiveValue::Set(vehicle.updated_at),
        }
    }
}

impl From<Model> for Vehicle {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            purchase_date: model.purchase_date,
            // Legacy rows without the flag behave as purchased.
            is_purchased: model.is_purchased.unwrap_or(true),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            mileage: Vec::new(),
            fuel_usages: Vec::new(),
            maintenance: Vec::new(),
        }
    }
}
