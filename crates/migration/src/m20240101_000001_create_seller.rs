//! Create `seller` table.
//!
//! Email carries a unique constraint; it is the source of truth for
//! duplicate detection under concurrent creates.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Seller::Table)
                    .if_not_exists()
                    .col(pk_auto(Seller::Id))
                    .col(string_len(Seller::FirstName, 100).not_null())
                    .col(string_len(Seller::LastName, 100).not_null())
                    .col(string_len(Seller::Email, 150).unique_key().not_null())
                    .col(timestamp_with_time_zone(Seller::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Seller::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Seller::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Seller { Table, Id, FirstName, LastName, Email, CreatedAt, UpdatedAt }
