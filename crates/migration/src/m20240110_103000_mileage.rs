use sea_orm_migration::prelude::*;

use crate::m20240110_101500_vehicles::Vehicles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Mileage {
    Table,
    Id,
    Value,
    Date,
    VehicleId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mileage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mileage::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mileage::Value).big_integer().not_null())
                    .col(ColumnDef::new(Mileage::Date).timestamp().not_null())
                    .col(ColumnDef::new(Mileage::VehicleId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mileage-vehicle_id")
                            .from(Mileage::Table, Mileage::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-mileage-vehicle_id-date")
                    .table(Mileage::Table)
                    .col(Mileage::VehicleId)
                    .col(Mileage::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mileage::Table).to_owned())
            .await
    }
}
