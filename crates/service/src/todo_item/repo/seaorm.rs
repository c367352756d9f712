use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::errors::ModelError;
use models::todo_item;

use crate::todo_item::domain::{ModifiedFields, PendingChange, TodoFilter, TodoItem};
use crate::todo_item::repository::{StoreError, TodoStore};

/// SeaORM-backed store. Optimistic concurrency is a conditional
/// `UPDATE … WHERE id = ? [AND version = ?]`; zero rows affected is a conflict.
pub struct SeaOrmTodoStore {
    pub db: DatabaseConnection,
}

impl SeaOrmTodoStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn backend(e: ModelError) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait::async_trait]
impl TodoStore for SeaOrmTodoStore {
    async fn query(&self, filter: &TodoFilter) -> Result<Vec<TodoItem>, StoreError> {
        let rows = todo_item::list(&self.db, filter.is_completed, filter.description_ci.as_deref())
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn any(&self, filter: &TodoFilter) -> Result<bool, StoreError> {
        todo_item::exists(&self.db, filter.is_completed, filter.description_ci.as_deref())
            .await
            .map_err(backend)
    }

    async fn find(&self, id: Uuid) -> Result<Option<TodoItem>, StoreError> {
        let row = todo_item::find(&self.db, id).await.map_err(backend)?;
        Ok(row.map(TodoItem::from))
    }

    async fn add(&self, item: &TodoItem) -> Result<(), StoreError> {
        todo_item::create(&self.db, item.id, &item.description, item.is_completed)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn commit(&self, change: PendingChange) -> Result<(), StoreError> {
        let PendingChange { item, fields, expected_version } = change;
        let description = match fields {
            ModifiedFields::All => Some(item.description.as_str()),
            ModifiedFields::Completion => None,
        };
        let affected = todo_item::apply_update(&self.db, item.id, description, item.is_completed, expected_version)
            .await
            .map_err(backend)?;
        if affected == 0 {
            return Err(StoreError::Concurrency);
        }
        Ok(())
    }
}
