use sea_orm_migration::prelude::*;

use crate::m20240110_103000_mileage::Mileage;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum FuelUsages {
    Table,
    Id,
    Liters,
    Cost,
    Date,
    IsPartialFill,
    MileageId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FuelUsages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelUsages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FuelUsages::Liters).double().not_null())
                    .col(ColumnDef::new(FuelUsages::Cost).double().not_null())
                    .col(ColumnDef::new(FuelUsages::Date).timestamp().not_null())
                    .col(
                        ColumnDef::new(FuelUsages::IsPartialFill)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Nullable: the startup repair clears dangling links
                    // instead of deleting the fill-up.
                    .col(ColumnDef::new(FuelUsages::MileageId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fuel_usages-mileage_id")
                            .from(FuelUsages::Table, FuelUsages::MileageId)
                            .to(Mileage::Table, Mileage::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fuel_usages-mileage_id")
                    .table(FuelUsages::Table)
                    .col(FuelUsages::MileageId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fuel_usages-date")
                    .table(FuelUsages::Table)
                    .col(FuelUsages::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FuelUsages::Table).to_owned())
            .await
    }
}
