use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::todo_item::domain::{ModifiedFields, PendingChange, TodoFilter, TodoItem};
use crate::todo_item::repository::{StoreError, TodoStore};

/// Process-local store keyed by id. Same commit semantics as the database store.
#[derive(Default)]
pub struct InMemoryTodoStore {
    items: RwLock<HashMap<Uuid, TodoItem>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self { Self::default() }

    /// Seed the store directly, bypassing service rules.
    pub async fn with_items(items: impl IntoIterator<Item = TodoItem>) -> Self {
        let store = Self::default();
        {
            let mut map = store.items.write().await;
            for item in items {
                map.insert(item.id, item);
            }
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn query(&self, filter: &TodoFilter) -> Result<Vec<TodoItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items.values().filter(|i| filter.matches(i)).cloned().collect())
    }

    async fn any(&self, filter: &TodoFilter) -> Result<bool, StoreError> {
        let items = self.items.read().await;
        Ok(items.values().any(|i| filter.matches(i)))
    }

    async fn find(&self, id: Uuid) -> Result<Option<TodoItem>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn add(&self, item: &TodoItem) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(StoreError::Backend(format!("duplicate id {}", item.id)));
        }
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn commit(&self, change: PendingChange) -> Result<(), StoreError> {
        let PendingChange { item, fields, expected_version } = change;
        let mut items = self.items.write().await;
        let Some(current) = items.get_mut(&item.id) else {
            return Err(StoreError::Concurrency);
        };
        if expected_version.is_some_and(|v| v != current.version) {
            return Err(StoreError::Concurrency);
        }
        if fields == ModifiedFields::All {
            current.description = item.description;
        }
        current.is_completed = item.is_completed;
        current.version += 1;
        Ok(())
    }
}
