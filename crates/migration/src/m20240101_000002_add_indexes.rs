//! Secondary indexes for the list query (`is_completed = false`).
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_todo_item::TodoItem;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_todo_item_is_completed")
                    .table(TodoItem::Table)
                    .col(TodoItem::IsCompleted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_todo_item_is_completed")
                    .table(TodoItem::Table)
                    .to_owned(),
            )
            .await
    }
}
