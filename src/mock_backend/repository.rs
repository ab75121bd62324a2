use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::models::{EntityId, Resource};

/// Repository errors for storage operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Resource not found")]
    NotFound,

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Trait defining storage operations for one resource kind
#[async_trait]
pub trait Repository<T: Resource>: Send + Sync {
    /// Store a new record under a freshly assigned identifier
    async fn insert(&self, record: T) -> Result<T, RepositoryError>;

    /// Replace the record with the same identifier
    async fn update(&self, record: T) -> Result<T, RepositoryError>;

    async fn find_by_id(&self, id: EntityId) -> Result<Option<T>, RepositoryError>;

    /// All records, ordered by identifier
    async fn find_all(&self) -> Result<Vec<T>, RepositoryError>;

    async fn delete(&self, id: EntityId) -> Result<(), RepositoryError>;
}

struct Store<T> {
    records: BTreeMap<EntityId, T>,
    next_id: EntityId,
}

/// Process-local repository backing the development API
pub struct InMemoryRepository<T> {
    store: Mutex<Store<T>>,
}

impl<T: Resource> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seeds the store. Records without an identifier get the next free one.
    pub fn with_records(records: Vec<T>) -> Self {
        let mut store = Store {
            records: BTreeMap::new(),
            next_id: 1,
        };
        for record in records {
            let id = record.id().unwrap_or(store.next_id);
            store.records.insert(id, record.with_id(id));
            store.next_id = store.next_id.max(id + 1);
        }

        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store<T>>, RepositoryError> {
        self.store
            .lock()
            .map_err(|_| RepositoryError::StorageError("store lock poisoned".to_string()))
    }
}

impl<T: Resource> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Resource> Repository<T> for InMemoryRepository<T> {
    async fn insert(&self, record: T) -> Result<T, RepositoryError> {
        let mut store = self.lock()?;
        let id = store.next_id;
        store.next_id += 1;

        let record = record.with_id(id);
        store.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, record: T) -> Result<T, RepositoryError> {
        let id = record.id().ok_or(RepositoryError::NotFound)?;
        let mut store = self.lock()?;
        match store.records.get_mut(&id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<T>, RepositoryError> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.lock()?.records.values().cloned().collect())
    }

    async fn delete(&self, id: EntityId) -> Result<(), RepositoryError> {
        match self.lock()?.records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }
}
