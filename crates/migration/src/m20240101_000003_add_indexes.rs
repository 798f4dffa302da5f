use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Book: index on seller_id for the eager-load join and the cascade
        manager
            .create_index(
                Index::create()
                    .name("idx_book_seller")
                    .table(Book::Table)
                    .col(Book::SellerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_book_seller").table(Book::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Book { Table, SellerId }
