//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{
    Collection, CollectionId, Container, ContainerId, DomainResult, Entity, GroupId, UserId,
};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity; `NotFound` if it does not exist
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID; `NotFound` if it does not exist
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Container lookups beyond plain CRUD
#[async_trait]
pub trait ContainerQueries: Send + Sync {
    /// Containers of a collection in insertion order
    async fn list_by_collection(&self, collection_id: &CollectionId) -> DomainResult<Vec<Container>>;

    /// Direct children of a container
    async fn get_children(&self, parent_id: &ContainerId) -> DomainResult<Vec<Container>>;
}

#[async_trait]
pub trait CollectionQueries: Send + Sync {
    async fn list_by_owner(&self, user_id: &UserId) -> DomainResult<Vec<Collection>>;

    async fn list_by_group(&self, group_id: &GroupId) -> DomainResult<Vec<Collection>>;
}

/// Everything the use cases need from container storage
pub trait ContainerStore: Repository<Container> + ContainerQueries {}

impl<T: Repository<Container> + ContainerQueries> ContainerStore for T {}

/// Everything the use cases need from collection storage
pub trait CollectionStore: Repository<Collection> + CollectionQueries {}

impl<T: Repository<Collection> + CollectionQueries> CollectionStore for T {}
