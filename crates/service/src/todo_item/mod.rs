//! Todo items: three-layer layout (domain, repository, service).

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{ModifiedFields, PendingChange, TodoFilter, TodoItem, TodoItemInput};
pub use repository::{StoreError, TodoStore};
pub use service::TodoService;
