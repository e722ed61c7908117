//! Create `engine` table.
//!
//! The engine id is generated by the application and shared with its car.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Engine::Table)
                    .if_not_exists()
                    .col(uuid(Engine::Id).primary_key())
                    .col(big_integer(Engine::Displacement).not_null())
                    .col(big_integer(Engine::Cylinders).not_null())
                    .col(big_integer(Engine::Range).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Engine::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Engine { Table, Id, Displacement, Cylinders, Range }
