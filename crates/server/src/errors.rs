use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.error, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let msg = Some(e.to_string());
        match &e {
            ServiceError::InvalidArgument(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", msg),
            // 重复的未完成描述按 400 返回
            ServiceError::Conflict(_) => JsonApiError::new(StatusCode::BAD_REQUEST, "Conflict", msg),
            ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", msg),
            ServiceError::Concurrency(id) => {
                error!(%id, code = e.code(), "unhandled concurrency conflict");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", msg)
            }
            ServiceError::Db(_) => {
                error!(err = %e, code = e.code(), "store failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", msg)
            }
        }
    }
}

/// Body extraction failures (bad JSON, wrong field types, missing content-type) are 400.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(rejection.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn maps_service_errors_to_status() {
        let cases = [
            (ServiceError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("todo item"), StatusCode::NOT_FOUND),
            (ServiceError::Concurrency(Uuid::new_v4()), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::Db("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }
}
