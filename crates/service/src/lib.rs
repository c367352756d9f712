//! Service layer for todo items.
//! - `TodoService` holds the request-handling rules (validation, uniqueness, conflict mapping).
//! - Persistence is reached only through the `TodoStore` trait.
//! - SeaORM and in-memory stores are provided.

pub mod errors;
pub mod todo_item;
#[cfg(test)]
pub mod test_support;

pub use todo_item::{TodoService, TodoStore};
