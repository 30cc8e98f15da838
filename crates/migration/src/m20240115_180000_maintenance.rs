use sea_orm_migration::prelude::*;

use crate::m20240110_101500_vehicles::Vehicles;
use crate::m20240110_103000_mileage::Mileage;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Maintenance {
    Table,
    Id,
    Kind,
    Cost,
    IsFree,
    Date,
    Notes,
    MileageId,
    VehicleId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Maintenance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Maintenance::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Maintenance::Kind).string().not_null())
                    .col(ColumnDef::new(Maintenance::Cost).double().not_null())
                    .col(
                        ColumnDef::new(Maintenance::IsFree)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Maintenance::Date).timestamp().not_null())
                    .col(ColumnDef::new(Maintenance::Notes).string())
                    .col(ColumnDef::new(Maintenance::MileageId).string())
                    .col(ColumnDef::new(Maintenance::VehicleId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-maintenance-vehicle_id")
                            .from(Maintenance::Table, Maintenance::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-maintenance-mileage_id")
                            .from(Maintenance::Table, Maintenance::MileageId)
                            .to(Mileage::Table, Mileage::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-maintenance-vehicle_id-date")
                    .table(Maintenance::Table)
                    .col(Maintenance::VehicleId)
                    .col(Maintenance::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Maintenance::Table).to_owned())
            .await
    }
}
