use sea_orm_migration::prelude::*;

use crate::m20240110_101500_vehicles::Vehicles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum VehicleFlags {
    IsPurchased,
    IsActive,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Nullable on purpose: rows written by older builds stay NULL until
        // the startup repair backfills them.
        manager
            .alter_table(
                Table::alter()
                    .table(Vehicles::Table)
                    .add_column(ColumnDef::new(VehicleFlags::IsPurchased).boolean())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Vehicles::Table)
                    .add_column(
                        ColumnDef::new(VehicleFlags::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Vehicles::Table)
                    .drop_column(VehicleFlags::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Vehicles::Table)
                    .drop_column(VehicleFlags::IsPurchased)
                    .to_owned(),
            )
            .await
    }
}
