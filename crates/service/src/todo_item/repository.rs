use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::domain::{PendingChange, TodoFilter, TodoItem};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The write matched no row: the record is gone or its version moved on.
    #[error("optimistic concurrency conflict")]
    Concurrency,
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Repository abstraction over the persistent todo collection.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn query(&self, filter: &TodoFilter) -> Result<Vec<TodoItem>, StoreError>;

    async fn any(&self, filter: &TodoFilter) -> Result<bool, StoreError> {
        Ok(!self.query(filter).await?.is_empty())
    }

    async fn find(&self, id: Uuid) -> Result<Option<TodoItem>, StoreError>;

    async fn add(&self, item: &TodoItem) -> Result<(), StoreError>;

    /// Apply the staged change. Returns `StoreError::Concurrency` when no row was written.
    async fn commit(&self, change: PendingChange) -> Result<(), StoreError>;
}
