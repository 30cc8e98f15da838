//! The module contains the `Maintenance` type, a service event on the
//! tracked vehicle.
use chrono::NaiveDateTime;
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::RepositoryError;

/// Kind of maintenance performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    TireChange,
    OilChange,
    BrakeCheck,
    Other,
}

impl MaintenanceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TireChange => "tire_change",
            Self::OilChange => "oil_change",
            Self::BrakeCheck => "brake_check",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for MaintenanceKind {
    type Error = RepositoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "tire_change" => Ok(Self::TireChange),
            "oil_change" => Ok(Self::OilChange),
            "brake_check" => Ok(Self::BrakeCheck),
            "other" => Ok(Self::Other),
            other => Err(RepositoryError::InvalidValue(format!(
                "invalid maintenance kind: {other}"
            ))),
        }
    }
}

/// A maintenance event.
///
/// `cost` is ignored when `is_free` is set (warranty work, favors). The
/// optional odometer reference is nullified when the reading goes away, never
/// the other way around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: String,
    pub kind: MaintenanceKind,
    pub cost: f64,
    pub is_free: bool,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
    pub mileage_id: Option<String>,
    pub vehicle_id: String,
}

impl Maintenance {
    pub fn new(
        kind: MaintenanceKind,
        cost: f64,
        is_free: bool,
        date: NaiveDateTime,
        notes: Option<String>,
        mileage_id: Option<String>,
        vehicle_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            cost,
            is_free,
            date,
            notes,
            mileage_id,
            vehicle_id,
        }
    }

    /// Cost actually paid, zero for free work.
    #[must_use]
    pub fn paid_cost(&self) -> f64 {
        if self.is_free { 0.0 } else { self.cost }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    #[sea_orm(column_type = "Double")]
    pub cost: f64,
    pub is_free: bool,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
    pub mileage_id: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::mileage::Entity",
        from = "Column::MileageId",
        to = "super::mileage::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Mileage,
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::mileage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mileage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Maintenance> for ActiveModel {
    fn from(maintenance: &Maintenance) -> Self {
        Self {
            id: ActiveValue::Set(maintenance.id.clone()),
            kind: ActiveValue::Set(maintenance.kind.as_str().to_string()),
            cost: ActiveValue::Set(maintenance.cost),
            is_free: ActiveValue::Set(maintenance.is_free),
            date: ActiveValue::Set(maintenance.date),
            notes: ActiveValue::Set(maintenance.notes.clone()),
            mileage_id: ActiveValue::Set(maintenance.mileage_id.clone()),
            vehicle_id: ActiveValue::Set(maintenance.vehicle_id.clone()),
        }
    }
}

impl TryFrom<Model> for Maintenance {
    type Error = RepositoryError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: MaintenanceKind::try_from(model.kind.as_str())?,
            cost: model.cost,
            is_free: model.is_free,
            date: model.date,
            notes: model.notes,
            mileage_id: model.mileage_id,
            vehicle_id: model.vehicle_id,
        })
    }
}
