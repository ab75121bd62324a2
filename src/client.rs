pub mod error;
pub mod resource_client;

use async_trait::async_trait;

use crate::models::{EntityId, Resource};

pub use error::{TransportError, COMMUNICATION_FAILURE_MESSAGE};
pub use resource_client::{CategoryClient, EntryClient, ResourceClient};

/// Data access operations for one resource kind.
///
/// Each call resolves exactly once, with either the mapped record(s) or a
/// `TransportError` that has already been logged.
#[async_trait]
pub trait ResourceApi<T: Resource>: Send + Sync {
    /// Fetch every record of the collection
    async fn list_all(&self) -> Result<Vec<T>, TransportError>;

    /// Fetch one record by identifier
    async fn get_by_id(&self, id: EntityId) -> Result<T, TransportError>;

    /// Store a new record and return the backend's copy, identifier included
    async fn create(&self, entity: &T) -> Result<T, TransportError>;

    /// Replace the record addressed by `entity`'s identifier.
    /// On success the submitted entity is returned as is, without a re-fetch.
    async fn update(&self, entity: T) -> Result<T, TransportError>;

    /// Remove a record
    async fn delete(&self, id: EntityId) -> Result<(), TransportError>;
}
