use thiserror::Error;
use uuid::Uuid;

use crate::todo_item::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    /// Write lost an optimistic-concurrency race against a record that still exists.
    #[error("concurrent modification of todo item {0}")]
    Concurrency(Uuid),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::InvalidArgument(_) => 2001,
            ServiceError::NotFound(_) => 2002,
            ServiceError::Conflict(_) => 2003,
            ServiceError::Concurrency(_) => 2101,
            ServiceError::Db(_) => 2200,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::InvalidArgument(msg),
            models::errors::ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Backend(msg) => Self::Db(msg),
            // 仅在 commit 之后由 service 显式处理；其他路径出现即视为存储异常
            StoreError::Concurrency => Self::Db("unexpected optimistic concurrency conflict".into()),
        }
    }
}
