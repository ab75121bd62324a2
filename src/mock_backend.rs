//! In-memory development API serving categories and entries under `/api`.
//!
//! Mirrors the contract the record client expects, so the form flows can run
//! end to end without an external server.

pub mod handlers;
pub mod repository;
pub mod routes;
pub mod seed;

use axum::{routing::get, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use utoipa::OpenApi;

use crate::models::{Category, Entry, EntryType};
use handlers::{ErrorResponse, ValidationErrorBody};
use repository::{InMemoryRepository, Repository};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::list_categories,
        routes::get_category,
        routes::create_category,
        routes::update_category,
        routes::delete_category,
        routes::list_entries,
        routes::get_entry,
        routes::create_entry,
        routes::update_entry,
        routes::delete_entry
    ),
    components(schemas(Category, Entry, EntryType, ErrorResponse, ValidationErrorBody)),
    tags(
        (name = "categories", description = "Category records"),
        (name = "entries", description = "Revenue and expense entries")
    ),
    info(
        title = "Finance Records API",
        version = "0.1.0",
        description = "Development API for categories and revenue/expense entries",
    )
)]
pub struct ApiDoc;

/// Shared state of the development API
#[derive(Clone)]
pub struct MockBackend {
    categories: Arc<dyn Repository<Category>>,
    entries: Arc<dyn Repository<Entry>>,
    // Held from the cross-record checks until the write lands
    writes: Arc<Mutex<()>>,
}

impl MockBackend {
    pub fn new(
        categories: Arc<dyn Repository<Category>>,
        entries: Arc<dyn Repository<Entry>>,
    ) -> Self {
        Self {
            categories,
            entries,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn empty() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
        )
    }

    /// Backend preloaded with the demo dataset
    pub fn seeded() -> Self {
        let (categories, entries) = seed::dataset();
        Self::new(
            Arc::new(InMemoryRepository::with_records(categories)),
            Arc::new(InMemoryRepository::with_records(entries)),
        )
    }

    pub fn categories(&self) -> &Arc<dyn Repository<Category>> {
        &self.categories
    }

    pub fn entries(&self) -> &Arc<dyn Repository<Entry>> {
        &self.entries
    }

    /// Serializes writers so a uniqueness or reference check stays true
    /// until the record it approved is stored.
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/health", get(|| async { "OK" }))
            .route("/api/docs/openapi.json", get(openapi_json))
            .merge(routes::category_routes())
            .merge(routes::entry_routes())
            .with_state(self)
    }

    /// Serves the router on `addr` in a background task.
    /// Binding port 0 picks a free port, returned with the handle.
    pub async fn spawn(self, addr: SocketAddr) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let app = self.router();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "development API stopped");
            }
        });
        tracing::debug!(%local_addr, "development API spawned");
        Ok((local_addr, handle))
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
