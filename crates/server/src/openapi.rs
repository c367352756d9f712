use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemDoc {
    pub id: Uuid,
    pub description: String,
    pub is_completed: bool,
    pub version: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemInputDoc {
    pub id: Option<Uuid>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub version: Option<i64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::todo_items::list,
        crate::routes::todo_items::get,
        crate::routes::todo_items::create,
        crate::routes::todo_items::update,
        crate::routes::todo_items::complete,
    ),
    components(
        schemas(
            HealthResponse,
            TodoItemDoc,
            TodoItemInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "todo")
    )
)]
pub struct ApiDoc;
