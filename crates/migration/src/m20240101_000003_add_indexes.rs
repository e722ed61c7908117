use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Car: listing by brand
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_car_brand")
                    .table(Car::Table)
                    .col(Car::Brand)
                    .to_owned(),
            )
            .await?;

        // Car: engine lookup by correlated id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_car_engine")
                    .table(Car::Table)
                    .col(Car::EngineId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_car_engine").table(Car::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_car_brand").table(Car::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Car { Table, Brand, EngineId }
