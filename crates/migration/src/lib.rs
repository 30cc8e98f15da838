pub use sea_orm_migration::prelude::*;

mod m20240110_101500_vehicles;
mod m20240110_103000_mileage;
mod m20240111_090000_fuel_usages;
mod m20240115_180000_maintenance;
mod m20240722_120000_vehicle_flags;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240110_101500_vehicles::Migration),
            Box::new(m20240110_103000_mileage::Migration),
            Box::new(m20240111_090000_fuel_usages::Migration),
            Box::new(m20240115_180000_maintenance::Migration),
            Box::new(m20240722_120000_vehicle_flags::Migration),
        ]
    }
}
