//! Documented per-resource endpoints. Each one forwards to the generic
//! handler in [`super::handlers`] so the OpenAPI document lists every operation.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::handlers::{
    create_handler, delete_handler, get_handler, list_handler, update_handler, BackendError,
    ErrorResponse, ValidationErrorBody,
};
use super::MockBackend;
use crate::models::{Category, EntityId, Entry};

pub fn category_routes() -> Router<MockBackend> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub fn entry_routes() -> Router<MockBackend> {
    Router::new()
        .route("/api/entries", get(list_entries).post(create_entry))
        .route(
            "/api/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Every category, ordered by id", body = Vec<Category>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn list_categories(state: State<MockBackend>) -> Result<Json<Vec<Category>>, BackendError> {
    list_handler::<Category>(state).await
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = u64, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn get_category(
    state: State<MockBackend>,
    id: Path<EntityId>,
) -> Result<Json<Category>, BackendError> {
    get_handler::<Category>(state, id).await
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = Category,
    responses(
        (status = 201, description = "Category created under a fresh id", body = Category),
        (status = 422, description = "Invalid category", body = ValidationErrorBody),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn create_category(
    state: State<MockBackend>,
    payload: Result<Json<Category>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), BackendError> {
    create_handler::<Category>(state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = u64, Path, description = "Category id")
    ),
    request_body = Category,
    responses(
        (status = 204, description = "Category replaced"),
        (status = 400, description = "Body id differs from path id", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 422, description = "Invalid category", body = ValidationErrorBody),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn update_category(
    state: State<MockBackend>,
    id: Path<EntityId>,
    payload: Result<Json<Category>, JsonRejection>,
) -> Result<StatusCode, BackendError> {
    update_handler::<Category>(state, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = u64, Path, description = "Category id")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    state: State<MockBackend>,
    id: Path<EntityId>,
) -> Result<StatusCode, BackendError> {
    delete_handler::<Category>(state, id).await
}

#[utoipa::path(
    get,
    path = "/api/entries",
    responses(
        (status = 200, description = "Every entry, ordered by id", body = Vec<Entry>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "entries"
)]
pub async fn list_entries(state: State<MockBackend>) -> Result<Json<Vec<Entry>>, BackendError> {
    list_handler::<Entry>(state).await
}

#[utoipa::path(
    get,
    path = "/api/entries/{id}",
    params(
        ("id" = u64, Path, description = "Entry id")
    ),
    responses(
        (status = 200, description = "The entry", body = Entry),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "entries"
)]
pub async fn get_entry(
    state: State<MockBackend>,
    id: Path<EntityId>,
) -> Result<Json<Entry>, BackendError> {
    get_handler::<Entry>(state, id).await
}

#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = Entry,
    responses(
        (status = 201, description = "Entry created under a fresh id", body = Entry),
        (status = 422, description = "Invalid entry", body = ValidationErrorBody),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "entries"
)]
pub async fn create_entry(
    state: State<MockBackend>,
    payload: Result<Json<Entry>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>), BackendError> {
    create_handler::<Entry>(state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/entries/{id}",
    params(
        ("id" = u64, Path, description = "Entry id")
    ),
    request_body = Entry,
    responses(
        (status = 204, description = "Entry replaced"),
        (status = 400, description = "Body id differs from path id", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 422, description = "Invalid entry", body = ValidationErrorBody),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "entries"
)]
pub async fn update_entry(
    state: State<MockBackend>,
    id: Path<EntityId>,
    payload: Result<Json<Entry>, JsonRejection>,
) -> Result<StatusCode, BackendError> {
    update_handler::<Entry>(state, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    params(
        ("id" = u64, Path, description = "Entry id")
    ),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "entries"
)]
pub async fn delete_entry(
    state: State<MockBackend>,
    id: Path<EntityId>,
) -> Result<StatusCode, BackendError> {
    delete_handler::<Entry>(state, id).await
}
