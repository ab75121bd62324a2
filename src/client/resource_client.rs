use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::instrument;

use super::{ResourceApi, TransportError};
use crate::config::ClientConfig;
use crate::models::{Category, EntityId, Entry, Resource};

/// HTTP client for the `api/<resource>` endpoints of the backend
pub struct ResourceClient<T> {
    http: Client,
    collection_url: String,
    _resource: PhantomData<fn() -> T>,
}

pub type CategoryClient = ResourceClient<Category>;
pub type EntryClient = ResourceClient<Entry>;

impl<T: Resource> ResourceClient<T> {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(http, &config.base_url)
    }

    /// Builds a client on top of an existing connection pool
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, TransportError> {
        let parsed = Url::parse(base_url)
            .map_err(|_| TransportError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl(base_url.to_string()));
        }

        let collection_url = format!("{}/api/{}", parsed.as_str().trim_end_matches('/'), T::PATH);
        Ok(Self {
            http,
            collection_url,
            _resource: PhantomData,
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn member_url(&self, id: EntityId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    async fn send(request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(status = status.as_u16(), error = %e, "could not read error response body");
                String::new()
            }
        };
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn read_json<D: DeserializeOwned>(response: Response) -> Result<D, TransportError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch_all(&self) -> Result<Vec<T>, TransportError> {
        let response = Self::send(self.http.get(&self.collection_url)).await?;
        Self::read_json(response).await
    }

    async fn fetch_one(&self, id: EntityId) -> Result<T, TransportError> {
        let response = Self::send(self.http.get(self.member_url(id))).await?;
        Self::read_json(response).await
    }

    async fn post(&self, entity: &T) -> Result<T, TransportError> {
        let response = Self::send(self.http.post(&self.collection_url).json(entity)).await?;
        Self::read_json(response).await
    }

    async fn put(&self, entity: T) -> Result<T, TransportError> {
        let id = entity.id().ok_or(TransportError::MissingId)?;
        Self::send(self.http.put(self.member_url(id)).json(&entity)).await?;
        Ok(entity)
    }

    async fn remove(&self, id: EntityId) -> Result<(), TransportError> {
        Self::send(self.http.delete(self.member_url(id))).await?;
        Ok(())
    }

    /// Single exit point for failures: logs once, then hands the error back
    fn handle_error(&self, operation: &'static str, error: TransportError) -> TransportError {
        tracing::error!(
            resource = T::PATH,
            operation,
            status = ?error.status(),
            error = %error,
            "request failed"
        );
        error
    }
}

#[async_trait]
impl<T: Resource> ResourceApi<T> for ResourceClient<T> {
    #[instrument(skip(self), fields(resource = T::PATH))]
    async fn list_all(&self) -> Result<Vec<T>, TransportError> {
        self.fetch_all()
            .await
            .map_err(|e| self.handle_error("list_all", e))
    }

    #[instrument(skip(self), fields(resource = T::PATH))]
    async fn get_by_id(&self, id: EntityId) -> Result<T, TransportError> {
        self.fetch_one(id)
            .await
            .map_err(|e| self.handle_error("get_by_id", e))
    }

    #[instrument(skip(self, entity), fields(resource = T::PATH))]
    async fn create(&self, entity: &T) -> Result<T, TransportError> {
        self.post(entity)
            .await
            .map_err(|e| self.handle_error("create", e))
    }

    #[instrument(skip(self, entity), fields(resource = T::PATH, id = ?entity.id()))]
    async fn update(&self, entity: T) -> Result<T, TransportError> {
        self.put(entity)
            .await
            .map_err(|e| self.handle_error("update", e))
    }

    #[instrument(skip(self), fields(resource = T::PATH))]
    async fn delete(&self, id: EntityId) -> Result<(), TransportError> {
        self.remove(id)
            .await
            .map_err(|e| self.handle_error("delete", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_is_built_from_base() {
        let client = CategoryClient::with_client(Client::new(), "http://localhost:8080/").unwrap();
        assert_eq!(client.collection_url(), "http://localhost:8080/api/categories");

        let client = EntryClient::with_client(Client::new(), "http://localhost:8080").unwrap();
        assert_eq!(client.collection_url(), "http://localhost:8080/api/entries");
        assert_eq!(client.member_url(2), "http://localhost:8080/api/entries/2");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = CategoryClient::with_client(Client::new(), "not a url");
        assert!(matches!(result, Err(TransportError::InvalidBaseUrl(_))));

        let result = CategoryClient::with_client(Client::new(), "mailto:someone@example.com");
        assert!(matches!(result, Err(TransportError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn test_update_without_id_fails_before_any_request() {
        // Port 9 (discard) is never contacted: the missing id is caught first
        let client = CategoryClient::with_client(Client::new(), "http://127.0.0.1:9").unwrap();

        let result = client.update(Category::new("Lazer", None)).await;

        assert!(matches!(result, Err(TransportError::MissingId)));
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
                .await
                .unwrap();
        });

        let client = CategoryClient::with_client(Client::new(), &format!("http://{}", addr)).unwrap();
        let error = client.list_all().await.unwrap_err();

        assert_eq!(error.status(), Some(500));
        assert_eq!(error.body(), Some(""));
    }

    #[tokio::test]
    async fn test_connection_failure_is_reported_as_network_error() {
        let client = CategoryClient::with_client(Client::new(), "http://127.0.0.1:1").unwrap();

        let result = client.list_all().await;

        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
