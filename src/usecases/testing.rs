//! Test fixtures: in-memory SQLite stores and a misbehaving container store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::{
    Collection, CollectionId, CollectionProps, Container, ContainerId, ContainerProps,
    ContainerType, DomainError, DomainResult, ObjectType, UserId,
};
use crate::repository::{
    init_db, CollectionRepository, ContainerQueries, ContainerRepository, ContainerStore,
    Repository,
};
use crate::services::{Caller, InMemoryMembership};

use super::context::Stores;

pub struct TestEnv {
    pub stores: Stores,
    pub membership: Arc<InMemoryMembership>,
}

pub async fn setup() -> TestEnv {
    let db = init_db(":memory:").await.expect("Failed to init test DB");
    let containers: Arc<dyn ContainerStore> = Arc::new(ContainerRepository::new(db.connection()));
    setup_with_containers(db.connection(), containers)
}

pub fn setup_with_containers(
    conn: crate::repository::SharedConnection,
    containers: Arc<dyn ContainerStore>,
) -> TestEnv {
    let membership = Arc::new(InMemoryMembership::new());
    TestEnv {
        stores: Stores::new(
            Arc::new(CollectionRepository::new(conn)),
            containers,
            membership.clone(),
        ),
        membership,
    }
}

pub fn caller(user: &str) -> Caller {
    Caller::new(user)
}

pub async fn seed_collection(env: &TestEnv, owner: &str, object_type: ObjectType) -> Collection {
    let collection = Collection::new(CollectionProps {
        user_id: UserId::from(owner),
        name: "Seeded".to_string(),
        object_type,
        ..Default::default()
    })
    .unwrap();
    env.stores.collections.create(&collection).await.unwrap()
}

pub async fn seed_container(
    env: &TestEnv,
    collection_id: &CollectionId,
    name: &str,
    kind: ContainerType,
    parent: Option<&ContainerId>,
    capacity: Option<f64>,
) -> Container {
    let container = Container::new(ContainerProps {
        collection_id: collection_id.clone(),
        name: name.to_string(),
        container_type: kind,
        parent_id: parent.cloned(),
        capacity,
        ..Default::default()
    })
    .unwrap();
    env.stores.containers.create(&container).await.unwrap()
}

/// Container store that misbehaves on demand: `update` fails from the N-th
/// call on (1-based) and hidden ids are never found by id.
pub struct FlakyContainerStore {
    inner: ContainerRepository,
    fail_from: Option<usize>,
    hidden: Vec<ContainerId>,
    updates: AtomicUsize,
}

impl FlakyContainerStore {
    pub fn new(inner: ContainerRepository) -> Self {
        Self {
            inner,
            fail_from: None,
            hidden: Vec::new(),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn fail_updates_from(mut self, call: usize) -> Self {
        self.fail_from = Some(call);
        self
    }

    pub fn hide(mut self, id: &ContainerId) -> Self {
        self.hidden.push(id.clone());
        self
    }

    /// Calls to `update` so far, failed ones included
    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Repository<Container> for FlakyContainerStore {
    async fn create(&self, entity: &Container) -> DomainResult<Container> {
        self.inner.create(entity).await
    }

    async fn find_by_id(&self, id: ContainerId) -> DomainResult<Option<Container>> {
        if self.hidden.contains(&id) {
            return Ok(None);
        }
        self.inner.find_by_id(id).await
    }

    async fn list(&self) -> DomainResult<Vec<Container>> {
        self.inner.list().await
    }

    async fn update(&self, entity: &Container) -> DomainResult<Container> {
        let call = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_from.is_some_and(|from| call >= from) {
            return Err(DomainError::Internal("disk full".to_string()));
        }
        self.inner.update(entity).await
    }

    async fn delete(&self, id: ContainerId) -> DomainResult<()> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl ContainerQueries for FlakyContainerStore {
    async fn list_by_collection(&self, collection_id: &CollectionId) -> DomainResult<Vec<Container>> {
        self.inner.list_by_collection(collection_id).await
    }

    async fn get_children(&self, parent_id: &ContainerId) -> DomainResult<Vec<Container>> {
        self.inner.get_children(parent_id).await
    }
}
