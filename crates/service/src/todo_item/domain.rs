use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted todo item as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub description: String,
    pub is_completed: bool,
    /// Optimistic-concurrency token; bumped on every successful write.
    pub version: i64,
}

impl TodoItem {
    /// New active item with a freshly generated id.
    pub fn new(description: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), description: description.into(), is_completed: false, version: 0 }
    }
}

impl From<models::todo_item::Model> for TodoItem {
    fn from(m: models::todo_item::Model) -> Self {
        Self { id: m.id, description: m.description, is_completed: m.is_completed, version: m.version }
    }
}

/// Request body for create/update/complete. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    /// When present, the write only applies if the stored version still matches.
    #[serde(default)]
    pub version: Option<i64>,
}

/// Query predicate understood by every `TodoStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub is_completed: Option<bool>,
    /// Case-insensitive description match.
    pub description_ci: Option<String>,
}

impl TodoFilter {
    pub fn incomplete() -> Self {
        Self { is_completed: Some(false), description_ci: None }
    }

    pub fn active_with_description(description: &str) -> Self {
        Self { is_completed: Some(false), description_ci: Some(description.to_string()) }
    }

    pub fn matches(&self, item: &TodoItem) -> bool {
        if let Some(done) = self.is_completed {
            if item.is_completed != done {
                return false;
            }
        }
        match &self.description_ci {
            Some(d) => item.description.to_lowercase() == d.to_lowercase(),
            None => true,
        }
    }
}

/// Which fields of a record a commit marks as modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifiedFields {
    /// Full replace: `description` and `is_completed`.
    All,
    /// Partial update: `is_completed` only.
    Completion,
}

/// A staged write handed to `TodoStore::commit`.
#[derive(Debug, Clone)]
pub struct PendingChange {
    pub item: TodoItem,
    pub fields: ModifiedFields,
    pub expected_version: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_missing_fields() {
        let input: TodoItemInput = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.id.is_none());
        assert!(input.description.is_none());
        assert!(!input.is_completed);
        assert!(input.version.is_none());
    }

    #[test]
    fn input_reads_camel_case() {
        let id = Uuid::new_v4();
        let input: TodoItemInput =
            serde_json::from_value(serde_json::json!({"id": id, "isCompleted": true, "version": 3})).unwrap();
        assert_eq!(input.id, Some(id));
        assert!(input.is_completed);
        assert_eq!(input.version, Some(3));
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let item = TodoItem::new("Buy Milk");
        assert!(TodoFilter::active_with_description("buy milk").matches(&item));
        assert!(TodoFilter::incomplete().matches(&item));

        let done = TodoItem { is_completed: true, ..item };
        assert!(!TodoFilter::active_with_description("BUY MILK").matches(&done));
        assert!(TodoFilter::default().matches(&done));
    }
}
