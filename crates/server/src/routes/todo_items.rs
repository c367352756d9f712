use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service::todo_item::{TodoItem, TodoItemInput};
use tracing::info;
use uuid::Uuid;

use crate::{errors::JsonApiError, routes::ServerState};

pub fn location(id: Uuid) -> String {
    format!("/todoitems/{id}")
}

#[utoipa::path(
    get, path = "/todoitems", tag = "todo",
    responses((status = 200, description = "Incomplete items", body = [crate::openapi::TodoItemDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<TodoItem>>, JsonApiError> {
    let items = state.todo_svc.list().await?;
    info!(count = items.len(), "list todo items");
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/todoitems/{id}", tag = "todo",
    params(("id" = Uuid, Path, description = "Todo item ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::TodoItemDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<TodoItem>, JsonApiError> {
    Ok(Json(state.todo_svc.get(id).await?))
}

#[utoipa::path(
    post, path = "/todoitems", tag = "todo",
    request_body = crate::openapi::TodoItemInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::TodoItemDoc),
        (status = 400, description = "Description missing or already used by an incomplete item")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<TodoItemInput>, JsonRejection>,
) -> Result<impl IntoResponse, JsonApiError> {
    let Json(input) = payload?;
    let item = state.todo_svc.create(input).await?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location(item.id))], Json(item)))
}

#[utoipa::path(
    put, path = "/todoitems/{id}", tag = "todo",
    params(("id" = Uuid, Path, description = "Todo item ID")),
    request_body = crate::openapi::TodoItemInputDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Id mismatch or missing description"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Concurrent modification")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<TodoItemInput>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Json(input) = payload?;
    state.todo_svc.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch, path = "/todoitems/{id}", tag = "todo",
    params(("id" = Uuid, Path, description = "Todo item ID")),
    request_body = crate::openapi::TodoItemInputDoc,
    responses(
        (status = 204, description = "Completion updated"),
        (status = 400, description = "Id mismatch"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Concurrent modification")
    )
)]
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<TodoItemInput>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Json(input) = payload?;
    state.todo_svc.complete(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
