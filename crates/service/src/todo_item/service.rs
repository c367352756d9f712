use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use models::todo_item::validate_description;

use super::domain::{ModifiedFields, PendingChange, TodoFilter, TodoItem, TodoItemInput};
use super::repository::{StoreError, TodoStore};
use crate::errors::ServiceError;

/// Todo business service independent of web framework.
pub struct TodoService<S: TodoStore + ?Sized> {
    store: Arc<S>,
}

impl<S: TodoStore + ?Sized> TodoService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    /// All items that are not completed, in store order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TodoItem>, ServiceError> {
        let items = self.store.query(&TodoFilter::incomplete()).await?;
        debug!(count = items.len(), "todo_items_listed");
        Ok(items)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<TodoItem, ServiceError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("todo item"))
    }

    /// Create a new active item. Any id, completion flag, or version in the
    /// input is ignored.
    ///
    /// # Examples
    /// ```
    /// use service::todo_item::{TodoService, TodoItemInput, repo::InMemoryTodoStore};
    /// use std::sync::Arc;
    /// let svc = TodoService::new(Arc::new(InMemoryTodoStore::new()));
    /// let input = TodoItemInput { description: Some("Buy milk".into()), ..Default::default() };
    /// let item = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(item.description, "Buy milk");
    /// assert!(!item.is_completed);
    /// ```
    #[instrument(skip(self, input), fields(description = ?input.description))]
    pub async fn create(&self, input: TodoItemInput) -> Result<TodoItem, ServiceError> {
        let description = input.description.unwrap_or_default();
        validate_description(&description)?;
        if self.store.any(&TodoFilter::active_with_description(&description)).await? {
            return Err(ServiceError::Conflict("Description already exists".into()));
        }

        let item = TodoItem::new(description);
        self.store.add(&item).await?;
        info!(id = %item.id, "todo_item_created");
        Ok(item)
    }

    /// Full replace of the mutable fields.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: TodoItemInput) -> Result<(), ServiceError> {
        ensure_same_id(id, &input)?;
        let description = input.description.unwrap_or_default();
        validate_description(&description)?;

        let change = PendingChange {
            item: TodoItem {
                id,
                description,
                is_completed: input.is_completed,
                version: input.version.unwrap_or_default(),
            },
            fields: ModifiedFields::All,
            expected_version: input.version,
        };
        self.commit(change).await?;
        info!(%id, "todo_item_updated");
        Ok(())
    }

    /// Partial update: only `is_completed` is written.
    #[instrument(skip(self, input), fields(is_completed = input.is_completed))]
    pub async fn complete(&self, id: Uuid, input: TodoItemInput) -> Result<(), ServiceError> {
        ensure_same_id(id, &input)?;

        let change = PendingChange {
            item: TodoItem {
                id,
                description: input.description.unwrap_or_default(),
                is_completed: input.is_completed,
                version: input.version.unwrap_or_default(),
            },
            fields: ModifiedFields::Completion,
            expected_version: input.version,
        };
        self.commit(change).await?;
        info!(%id, is_completed = input.is_completed, "todo_item_completion_set");
        Ok(())
    }

    /// Commit, then classify a concurrency conflict: a vanished record is
    /// `NotFound`; a record that still exists is `Concurrency` and is not retried.
    async fn commit(&self, change: PendingChange) -> Result<(), ServiceError> {
        let id = change.item.id;
        match self.store.commit(change).await {
            Ok(()) => Ok(()),
            Err(StoreError::Concurrency) => {
                if self.store.find(id).await?.is_none() {
                    return Err(ServiceError::not_found("todo item"));
                }
                warn!(%id, "todo_item_concurrency_conflict");
                Err(ServiceError::Concurrency(id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn ensure_same_id(id: Uuid, input: &TodoItemInput) -> Result<(), ServiceError> {
    if input.id != Some(id) {
        return Err(ServiceError::InvalidArgument("id in path does not match id in body".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo_item::repo::{InMemoryTodoStore, SeaOrmTodoStore};
    use crate::test_support::get_db;

    fn svc() -> (Arc<InMemoryTodoStore>, TodoService<InMemoryTodoStore>) {
        let store = Arc::new(InMemoryTodoStore::new());
        (store.clone(), TodoService::new(store))
    }

    fn describe(d: &str) -> TodoItemInput {
        TodoItemInput { description: Some(d.into()), ..Default::default() }
    }

    fn body(id: Uuid) -> TodoItemInput {
        TodoItemInput { id: Some(id), ..Default::default() }
    }

    #[tokio::test]
    async fn create_then_get_returns_active_item() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let created = svc.create(describe("Buy milk")).await?;
        let fetched = svc.get(created.id).await?;
        assert_eq!(fetched.description, "Buy milk");
        assert!(!fetched.is_completed);
        assert_eq!(fetched, created);
        Ok(())
    }

    #[tokio::test]
    async fn create_ignores_client_id_and_completion() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let client_id = Uuid::new_v4();
        let input = TodoItemInput { id: Some(client_id), is_completed: true, ..describe("Fresh") };
        let created = svc.create(input).await?;
        assert_ne!(created.id, client_id);
        assert!(!created.is_completed);
        assert_eq!(created.version, 0);
        Ok(())
    }

    #[tokio::test]
    async fn create_without_description_persists_nothing() -> Result<(), anyhow::Error> {
        let (store, svc) = svc();
        let missing = svc.create(TodoItemInput::default()).await;
        assert!(matches!(missing, Err(ServiceError::InvalidArgument(_))));
        let empty = svc.create(describe("")).await;
        assert!(matches!(empty, Err(ServiceError::InvalidArgument(_))));
        assert!(store.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_case_insensitive_duplicate_of_active_item() -> Result<(), anyhow::Error> {
        let (store, svc) = svc();
        svc.create(describe("A")).await?;
        let dup = svc.create(describe("a")).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn completed_item_does_not_block_same_description() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let first = svc.create(describe("Laundry")).await?;
        svc.complete(first.id, TodoItemInput { is_completed: true, ..body(first.id) }).await?;

        let second = svc.create(describe("LAUNDRY")).await?;
        assert_ne!(second.id, first.id);
        Ok(())
    }

    #[tokio::test]
    async fn list_excludes_completed_items() -> Result<(), anyhow::Error> {
        let store = Arc::new(
            InMemoryTodoStore::with_items([
                TodoItem::new("open 1"),
                TodoItem { is_completed: true, ..TodoItem::new("done") },
                TodoItem::new("open 2"),
            ])
            .await,
        );
        let svc = TodoService::new(store);
        let items = svc.list().await?;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| !i.is_completed));
        Ok(())
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_, svc) = svc();
        assert!(matches!(svc.get(Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn mismatched_ids_are_invalid_whether_or_not_the_item_exists() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let existing = svc.create(describe("Exists")).await?;
        let other = Uuid::new_v4();

        for path_id in [existing.id, Uuid::new_v4()] {
            let upd = svc.update(path_id, TodoItemInput { description: Some("x".into()), ..body(other) }).await;
            assert!(matches!(upd, Err(ServiceError::InvalidArgument(_))));
            let cmp = svc.complete(path_id, body(other)).await;
            assert!(matches!(cmp, Err(ServiceError::InvalidArgument(_))));
            // missing body id counts as a mismatch too
            let cmp = svc.complete(path_id, TodoItemInput::default()).await;
            assert!(matches!(cmp, Err(ServiceError::InvalidArgument(_))));
        }
        assert_eq!(svc.get(existing.id).await?, existing);
        Ok(())
    }

    #[tokio::test]
    async fn buy_milk_scenario() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let x = svc.create(describe("Buy milk")).await?;
        assert!(!svc.get(x.id).await?.is_completed);

        svc.complete(x.id, TodoItemInput { is_completed: true, ..body(x.id) }).await?;
        assert!(svc.list().await?.iter().all(|i| i.id != x.id));

        let after = svc.get(x.id).await?;
        assert!(after.is_completed);
        assert_eq!(after.description, "Buy milk");
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_mutable_fields() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let item = svc.create(describe("Old")).await?;
        let input = TodoItemInput { description: Some("New".into()), is_completed: true, ..body(item.id) };
        svc.update(item.id, input).await?;
        let after = svc.get(item.id).await?;
        assert_eq!(after.description, "New");
        assert!(after.is_completed);
        assert_eq!(after.version, 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_requires_description() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let item = svc.create(describe("Keep")).await?;
        let res = svc.update(item.id, body(item.id)).await;
        assert!(matches!(res, Err(ServiceError::InvalidArgument(_))));
        assert_eq!(svc.get(item.id).await?.description, "Keep");
        Ok(())
    }

    #[tokio::test]
    async fn complete_never_touches_description() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let item = svc.create(describe("Original")).await?;
        let input = TodoItemInput { description: Some("Changed".into()), is_completed: true, ..body(item.id) };
        svc.complete(item.id, input).await?;
        let after = svc.get(item.id).await?;
        assert_eq!(after.description, "Original");
        assert!(after.is_completed);
        Ok(())
    }

    #[tokio::test]
    async fn write_to_missing_item_is_not_found() {
        let (_, svc) = svc();
        let id = Uuid::new_v4();
        let upd = svc.update(id, TodoItemInput { description: Some("x".into()), ..body(id) }).await;
        assert!(matches!(upd, Err(ServiceError::NotFound(_))));
        let cmp = svc.complete(id, body(id)).await;
        assert!(matches!(cmp, Err(ServiceError::NotFound(_))));
    }

    // A lost race against a record that still exists is surfaced as a fatal
    // Concurrency error rather than a structured Conflict.
    #[tokio::test]
    async fn stale_version_on_existing_item_is_fatal_concurrency_error() -> Result<(), anyhow::Error> {
        let (_, svc) = svc();
        let item = svc.create(describe("Contended")).await?;
        svc.complete(item.id, TodoItemInput { is_completed: true, version: Some(0), ..body(item.id) }).await?;

        let stale = TodoItemInput { description: Some("Mine".into()), version: Some(0), ..body(item.id) };
        let res = svc.update(item.id, stale).await;
        assert!(matches!(res, Err(ServiceError::Concurrency(id)) if id == item.id));

        let stale = TodoItemInput { version: Some(0), ..body(item.id) };
        let res = svc.complete(item.id, stale).await;
        assert!(matches!(res, Err(ServiceError::Concurrency(_))));

        let after = svc.get(item.id).await?;
        assert_eq!(after.description, "Contended");
        assert!(after.is_completed);
        Ok(())
    }

    #[tokio::test]
    async fn service_over_seaorm_store() -> Result<(), anyhow::Error> {
        let store: Arc<dyn TodoStore> = Arc::new(SeaOrmTodoStore::new(get_db().await?));
        let svc = TodoService::new(store);

        let a = svc.create(describe("A")).await?;
        assert!(matches!(svc.create(describe("a")).await, Err(ServiceError::Conflict(_))));

        svc.complete(a.id, TodoItemInput { is_completed: true, ..body(a.id) }).await?;
        assert!(svc.list().await?.is_empty());
        svc.create(describe("a")).await?;

        let missing = Uuid::new_v4();
        assert!(matches!(svc.complete(missing, body(missing)).await, Err(ServiceError::NotFound(_))));

        let stale = TodoItemInput { description: Some("B".into()), version: Some(0), ..body(a.id) };
        assert!(matches!(svc.update(a.id, stale).await, Err(ServiceError::Concurrency(_))));
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_store_rejects_exact_non_ascii_duplicate() -> Result<(), anyhow::Error> {
        let svc = TodoService::new(Arc::new(SeaOrmTodoStore::new(get_db().await?)));

        svc.create(describe("Äpfel kaufen")).await?;
        assert!(matches!(svc.create(describe("Äpfel kaufen")).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(svc.create(describe("ÄPFEL KAUFEN")).await, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.list().await?.len(), 1);
        Ok(())
    }
}
