//! Vehicle data repository for Benzina.
//!
//! The crate owns the persisted vehicle-domain entities (vehicle, odometer
//! readings, fuel fill-ups, maintenance events), enforces the invariants
//! between them, derives monthly statistics, and repairs legacy records at
//! startup. Persistence goes through sea-orm; callers get a
//! [`VehicleRepository`] built over an open [`sea_orm::DatabaseConnection`].
pub use currency::Currency;
pub use error::RepositoryError;
pub use fuel_usages::FuelUsage;
pub use maintenance::{Maintenance, MaintenanceKind};
pub use mileage::Mileage;
pub use ops::{RepairReport, VehicleRepository, VehicleRepositoryBuilder};
pub use settings::{MaintenanceIntervals, SettingsProvider, StaticSettings};
pub use stats::MonthlyRecap;
pub use vehicles::Vehicle;

mod currency;
mod error;
pub mod fuel_usages;
pub mod maintenance;
pub mod mileage;
mod ops;
mod settings;
pub mod stats;
pub mod vehicles;

pub type ResultRepo<T> = Result<T, RepositoryError>;
