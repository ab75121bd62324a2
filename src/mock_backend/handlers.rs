use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use super::repository::{Repository, RepositoryError};
use super::MockBackend;
use crate::models::{Category, EntityId, Entry, Resource};
use crate::validation::{field_messages, flatten_messages};

/// Error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

/// Body of a 422 response, one user-displayable message per problem
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorBody {
    pub errors: Vec<String>,
}

/// Backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Record not found")]
    NotFound,

    #[error("Request id does not match the record id")]
    IdMismatch,

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for BackendError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => BackendError::NotFound,
            RepositoryError::StorageError(msg) => BackendError::Storage(msg),
        }
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        BackendError::Validation(vec![rejection.body_text()])
    }
}

/// Convert BackendError to HTTP response
impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            BackendError::Validation(errors) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ValidationErrorBody { errors }),
                )
                    .into_response();
            }
            BackendError::NotFound => (StatusCode::NOT_FOUND, "not_found", "Record not found".to_string()),
            BackendError::IdMismatch => (
                StatusCode::BAD_REQUEST,
                "id_mismatch",
                "Request id does not match the record id".to_string(),
            ),
            BackendError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = error_type, "{}", message);
        }
        (status, Json(ErrorResponse::new(error_type, &message))).into_response()
    }
}

/// A resource the backend can store and serve
#[async_trait]
pub trait StoredResource: Resource + Validate {
    fn repository(backend: &MockBackend) -> &Arc<dyn Repository<Self>>;

    /// Checks that need other records, run after field validation.
    /// `exclude` is the identifier of the record being replaced.
    async fn check(&self, backend: &MockBackend, exclude: Option<EntityId>)
        -> Result<(), BackendError>;

    /// Shape of the record as stored
    fn for_storage(self) -> Self {
        self
    }

    /// Shape of the record as returned to clients
    async fn present(self, _backend: &MockBackend) -> Self {
        self
    }
}

#[async_trait]
impl StoredResource for Category {
    fn repository(backend: &MockBackend) -> &Arc<dyn Repository<Self>> {
        backend.categories()
    }

    async fn check(
        &self,
        backend: &MockBackend,
        exclude: Option<EntityId>,
    ) -> Result<(), BackendError> {
        let name = self.name.trim().to_lowercase();
        let taken = backend
            .categories()
            .find_all()
            .await?
            .iter()
            .any(|c| c.id != exclude && c.name.trim().to_lowercase() == name);

        if taken {
            return Err(BackendError::Validation(vec![
                "name already exists".to_string()
            ]));
        }
        Ok(())
    }
}

#[async_trait]
impl StoredResource for Entry {
    fn repository(backend: &MockBackend) -> &Arc<dyn Repository<Self>> {
        backend.entries()
    }

    async fn check(
        &self,
        backend: &MockBackend,
        _exclude: Option<EntityId>,
    ) -> Result<(), BackendError> {
        if backend
            .categories()
            .find_by_id(self.category_id)
            .await?
            .is_none()
        {
            return Err(BackendError::Validation(vec![format!(
                "category {} does not exist",
                self.category_id
            )]));
        }
        Ok(())
    }

    fn for_storage(self) -> Self {
        self.without_category()
    }

    async fn present(mut self, backend: &MockBackend) -> Self {
        match backend.categories().find_by_id(self.category_id).await {
            Ok(category) => self.category = category,
            Err(e) => {
                tracing::warn!(category_id = self.category_id, error = %e, "could not embed category")
            }
        }
        self
    }
}

fn validate_payload<T: Validate>(payload: &T) -> Result<(), BackendError> {
    payload
        .validate()
        .map_err(|errors| BackendError::Validation(flatten_messages(&field_messages(&errors))))
}

/// Handler for listing every record of a collection
pub async fn list_handler<T: StoredResource>(
    State(backend): State<MockBackend>,
) -> Result<Json<Vec<T>>, BackendError> {
    let records = T::repository(&backend).find_all().await?;

    let mut presented = Vec::with_capacity(records.len());
    for record in records {
        presented.push(record.present(&backend).await);
    }
    Ok(Json(presented))
}

/// Handler for fetching one record
pub async fn get_handler<T: StoredResource>(
    State(backend): State<MockBackend>,
    Path(id): Path<EntityId>,
) -> Result<Json<T>, BackendError> {
    let record = T::repository(&backend)
        .find_by_id(id)
        .await?
        .ok_or(BackendError::NotFound)?;
    Ok(Json(record.present(&backend).await))
}

/// Handler for creating a record; the backend assigns the identifier
pub async fn create_handler<T: StoredResource>(
    State(backend): State<MockBackend>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<(StatusCode, Json<T>), BackendError> {
    let Json(payload) = payload?;
    validate_payload(&payload)?;

    let _writes = backend.lock_writes().await;
    payload.check(&backend, None).await?;
    let created = T::repository(&backend).insert(payload.for_storage()).await?;
    tracing::info!(resource = T::PATH, id = ?created.id(), "record created");
    Ok((StatusCode::CREATED, Json(created.present(&backend).await)))
}

/// Handler for replacing a record
pub async fn update_handler<T: StoredResource>(
    State(backend): State<MockBackend>,
    Path(id): Path<EntityId>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<StatusCode, BackendError> {
    let Json(payload) = payload?;
    if payload.id().is_some_and(|body_id| body_id != id) {
        return Err(BackendError::IdMismatch);
    }
    validate_payload(&payload)?;

    let _writes = backend.lock_writes().await;
    payload.check(&backend, Some(id)).await?;
    T::repository(&backend)
        .update(payload.with_id(id).for_storage())
        .await?;
    tracing::info!(resource = T::PATH, id, "record updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for deleting a record
pub async fn delete_handler<T: StoredResource>(
    State(backend): State<MockBackend>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, BackendError> {
    T::repository(&backend).delete(id).await?;
    tracing::info!(resource = T::PATH, id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_backend::repository::InMemoryRepository;
    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    // Repository whose every call fails, as a broken store would
    struct FailingRepository;

    #[async_trait]
    impl<T: Resource> Repository<T> for FailingRepository {
        async fn insert(&self, _record: T) -> Result<T, RepositoryError> {
            Err(RepositoryError::StorageError("disk on fire".to_string()))
        }

        async fn update(&self, _record: T) -> Result<T, RepositoryError> {
            Err(RepositoryError::StorageError("disk on fire".to_string()))
        }

        async fn find_by_id(&self, _id: EntityId) -> Result<Option<T>, RepositoryError> {
            Err(RepositoryError::StorageError("disk on fire".to_string()))
        }

        async fn find_all(&self) -> Result<Vec<T>, RepositoryError> {
            Err(RepositoryError::StorageError("disk on fire".to_string()))
        }

        async fn delete(&self, _id: EntityId) -> Result<(), RepositoryError> {
            Err(RepositoryError::StorageError("disk on fire".to_string()))
        }
    }

    fn app() -> Router {
        MockBackend::seeded().router()
    }

    async fn parse_json_body(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_categories() {
        let response = app().oneshot(get_request("/api/categories")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response.into_body()).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Moradia", "Saúde", "Lazer", "Salário", "Freelas"]);
    }

    #[tokio::test]
    async fn test_get_entry_embeds_category() {
        let response = app().oneshot(get_request("/api/entries/2")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["id"], 2);
        assert_eq!(body["type"], "expense");
        assert_eq!(body["amount"], "70,80");
        assert_eq!(body["date"], "14/10/2018");
        assert_eq!(body["paid"], false);
        assert_eq!(body["categoryId"], 2);
        assert_eq!(body["category"]["name"], "Saúde");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let response = app().oneshot(get_request("/api/categories/99")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_create_category_assigns_id() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/categories",
                json!({ "name": "Viagens", "description": "Passagens e hotéis" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["id"], 6);
        assert_eq!(body["name"], "Viagens");
        assert_eq!(body["description"], "Passagens e hotéis");
    }

    #[tokio::test]
    async fn test_create_duplicate_category_name() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/categories",
                json!({ "name": "lazer" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body, json!({ "errors": ["name already exists"] }));
    }

    #[tokio::test]
    async fn test_create_category_short_name() {
        let response = app()
            .oneshot(json_request("POST", "/api/categories", json!({ "name": "X" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(
            body["errors"][0],
            "name: Name must be at least 2 characters"
        );
    }

    #[tokio::test]
    async fn test_create_entry_with_unknown_category() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/entries",
                json!({
                    "name": "Pizza",
                    "type": "expense",
                    "amount": "42,00",
                    "date": "01/02/2019",
                    "paid": true,
                    "categoryId": 42
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["errors"][0], "category 42 does not exist");
    }

    #[tokio::test]
    async fn test_create_entry_with_zero_amount() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/entries",
                json!({
                    "name": "Pizza",
                    "type": "expense",
                    "amount": "0,00",
                    "date": "01/02/2019",
                    "paid": true,
                    "categoryId": 3
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["errors"][0], "amount: Amount must be greater than 0");
    }

    #[tokio::test]
    async fn test_create_entry_with_malformed_date() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/entries",
                json!({
                    "name": "Pizza",
                    "type": "expense",
                    "amount": "42,00",
                    "date": "2019-02-01",
                    "paid": true,
                    "categoryId": 3
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let app = app();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/entries/2",
                json!({
                    "id": 2,
                    "name": "Remédios demais",
                    "type": "expense",
                    "amount": "70,80",
                    "date": "14/10/2018",
                    "paid": true,
                    "categoryId": 2
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get_request("/api/entries/2")).await.unwrap();
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["paid"], true);
        assert_eq!(body["category"]["id"], 2);
    }

    #[tokio::test]
    async fn test_update_category_keeps_own_name() {
        let response = app()
            .oneshot(json_request(
                "PUT",
                "/api/categories/3",
                json!({ "id": 3, "name": "Lazer", "description": "Cinema e parques" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_update_id_mismatch() {
        let response = app()
            .oneshot(json_request(
                "PUT",
                "/api/categories/3",
                json!({ "id": 4, "name": "Lazer" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["error"], "id_mismatch");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let response = app()
            .oneshot(json_request(
                "PUT",
                "/api/categories/77",
                json!({ "name": "Fantasma" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let app = app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/entries/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get_request("/api/entries/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_names_store_one_category() {
        let app = app();

        let requests: Vec<_> = (0..8)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move {
                    app.oneshot(json_request(
                        "POST",
                        "/api/categories",
                        json!({ "name": "Viagens" }),
                    ))
                    .await
                    .unwrap()
                    .status()
                })
            })
            .collect();

        let mut created = 0;
        for request in requests {
            match request.await.unwrap() {
                StatusCode::CREATED => created += 1,
                status => assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY),
            }
        }
        assert_eq!(created, 1);

        let response = app.oneshot(get_request("/api/categories")).await.unwrap();
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let backend = MockBackend::new(Arc::new(FailingRepository), Arc::new(FailingRepository));
        let response = backend
            .router()
            .oneshot(get_request("/api/categories"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body["error"], "storage_error");
        assert_eq!(body["message"], "disk on fire");
    }

    #[tokio::test]
    async fn test_empty_backend_lists_nothing() {
        let backend = MockBackend::new(
            Arc::new(InMemoryRepository::<Category>::new()),
            Arc::new(InMemoryRepository::<Entry>::new()),
        );
        let response = backend
            .router()
            .oneshot(get_request("/api/entries"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response.into_body()).await;
        assert_eq!(body, json!([]));
    }
}
