//! Create `car` table.
//!
//! `id` and `engine_id` hold the same value; there is deliberately no foreign
//! key so that car and engine rows are written independently.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Car::Table)
                    .if_not_exists()
                    .col(uuid(Car::Id).primary_key())
                    .col(uuid(Car::EngineId).not_null())
                    .col(string_len(Car::Name, 128).not_null())
                    .col(integer(Car::Year).not_null())
                    .col(string_len(Car::Brand, 32).not_null())
                    .col(string_len(Car::FuelType, 16).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Car::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Car { Table, Id, EngineId, Name, Year, Brand, FuelType }
