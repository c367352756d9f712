//! Create `todo_item` table.
//! `version` is the optimistic-concurrency token bumped by every write.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoItem::Table)
                    .if_not_exists()
                    .col(uuid(TodoItem::Id).primary_key())
                    .col(text(TodoItem::Description).not_null())
                    .col(boolean(TodoItem::IsCompleted).not_null().default(false))
                    .col(big_integer(TodoItem::Version).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TodoItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum TodoItem {
    Table,
    Id,
    Description,
    IsCompleted,
    Version,
}
