//! Create `house` table.
//! Each listing belongs to one category; removing a category removes its listings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(House::Table)
                    .if_not_exists()
                    .col(pk_auto(House::Id))
                    .col(string_len(House::House, 256).not_null())
                    .col(double(House::Price).not_null())
                    .col(big_integer(House::Surface).not_null())
                    .col(text(House::Description).not_null())
                    .col(integer(House::CategoryId).not_null())
                    .col(string_len(House::Username, 128).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_house_category")
                            .from(House::Table, House::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_house_username")
                    .table(House::Table)
                    .col(House::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(House::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum House {
    Table,
    Id,
    House,
    Price,
    Surface,
    Description,
    CategoryId,
    Username,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
