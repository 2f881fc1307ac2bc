//! Shared collaborators and access-checked loaders for the use cases.

use std::sync::Arc;

use crate::domain::{Collection, CollectionId, Container, ContainerId, DomainError, DomainResult};
use crate::repository::{CollectionStore, ContainerStore};
use crate::services::{check_collection_access, Caller, MembershipService};

#[derive(Clone)]
pub struct Stores {
    pub collections: Arc<dyn CollectionStore>,
    pub containers: Arc<dyn ContainerStore>,
    pub membership: Arc<dyn MembershipService>,
}

impl Stores {
    pub fn new(
        collections: Arc<dyn CollectionStore>,
        containers: Arc<dyn ContainerStore>,
        membership: Arc<dyn MembershipService>,
    ) -> Self {
        Self {
            collections,
            containers,
            membership,
        }
    }

    /// Load a collection the caller may act on
    pub async fn accessible_collection(
        &self,
        caller: &Caller,
        id: &CollectionId,
    ) -> DomainResult<Collection> {
        let collection = self
            .collections
            .find_by_id(id.clone())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Collection {}", id)))?;
        check_collection_access(self.membership.as_ref(), caller, &collection).await?;
        Ok(collection)
    }

    /// Load a container and its collection, checking access via the collection
    pub async fn accessible_container(
        &self,
        caller: &Caller,
        id: &ContainerId,
    ) -> DomainResult<(Container, Collection)> {
        let container = self.find_container(id).await?;
        let collection = self
            .accessible_collection(caller, &container.collection_id)
            .await?;
        Ok((container, collection))
    }

    pub async fn find_container(&self, id: &ContainerId) -> DomainResult<Container> {
        self.containers
            .find_by_id(id.clone())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Container {}", id)))
    }
}
