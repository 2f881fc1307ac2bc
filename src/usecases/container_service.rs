//! Container use cases

use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::domain::{
    CollectionId, Container, ContainerId, ContainerProps, ContainerType, DomainError,
    DomainResult, FieldUpdate, GroupId,
};
use crate::services::Caller;

use super::context::Stores;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContainerInput {
    pub collection_id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub container_type: ContainerType,
    #[serde(default)]
    pub parent_id: Option<ContainerId>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub location: String,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub rows: Option<u32>,
    pub capacity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContainerInput {
    pub name: Option<String>,
    pub container_type: Option<ContainerType>,
    pub location: Option<String>,
    #[serde(default)]
    pub parent_id: FieldUpdate<ContainerId>,
    #[serde(default)]
    pub category_id: FieldUpdate<String>,
    #[serde(default)]
    pub group_id: FieldUpdate<GroupId>,
    #[serde(default)]
    pub width: FieldUpdate<f64>,
    #[serde(default)]
    pub depth: FieldUpdate<f64>,
    #[serde(default)]
    pub rows: FieldUpdate<u32>,
    #[serde(default)]
    pub capacity: FieldUpdate<f64>,
}

impl UpdateContainerInput {
    fn touches_dimensions(&self) -> bool {
        !(self.width.is_unset()
            && self.depth.is_unset()
            && self.rows.is_unset()
            && self.capacity.is_unset())
    }
}

pub struct ContainerService {
    stores: Stores,
}

impl ContainerService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn create(&self, caller: &Caller, input: CreateContainerInput) -> DomainResult<Container> {
        self.stores
            .accessible_collection(caller, &input.collection_id)
            .await?;
        if let Some(parent_id) = &input.parent_id {
            self.check_parent(parent_id, &input.collection_id).await?;
        }

        let container = Container::new(ContainerProps {
            collection_id: input.collection_id,
            name: input.name,
            container_type: input.container_type,
            parent_id: input.parent_id,
            category_id: input.category_id,
            group_id: input.group_id,
            location: input.location,
            width: input.width,
            depth: input.depth,
            rows: input.rows,
            capacity: input.capacity,
        })?;

        let created = self.stores.containers.create(&container).await?;
        log::info!(
            "container {} ({}) created in collection {}",
            created.id,
            created.container_type.as_str(),
            created.collection_id
        );
        Ok(created)
    }

    pub async fn get(&self, caller: &Caller, id: &ContainerId) -> DomainResult<Container> {
        let (container, _) = self.stores.accessible_container(caller, id).await?;
        Ok(container)
    }

    pub async fn list(&self, caller: &Caller, collection_id: &CollectionId) -> DomainResult<Vec<Container>> {
        self.stores.accessible_collection(caller, collection_id).await?;
        self.stores.containers.list_by_collection(collection_id).await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &ContainerId,
        input: UpdateContainerInput,
    ) -> DomainResult<Container> {
        let (mut container, _) = self.stores.accessible_container(caller, id).await?;

        if let Some(name) = &input.name {
            container.rename(name)?;
        }
        if let Some(container_type) = input.container_type {
            container.container_type = container_type;
        }
        if let Some(location) = &input.location {
            container.location = location.clone();
        }

        if let FieldUpdate::Set(parent_id) = &input.parent_id {
            if parent_id == &container.id {
                return Err(DomainError::InvalidInput(
                    "container cannot be its own parent".to_string(),
                ));
            }
            self.check_parent(parent_id, &container.collection_id).await?;
            self.check_no_cycle(&container, parent_id).await?;
        }
        if input.touches_dimensions() {
            container.update_dimensions(
                input.width.apply(container.width),
                input.depth.apply(container.depth),
                input.rows.apply(container.rows),
                input.capacity.apply(container.capacity),
            )?;
        }
        container.parent_id = input.parent_id.apply(container.parent_id.take());
        container.category_id = input.category_id.apply(container.category_id.take());
        container.group_id = input.group_id.apply(container.group_id.take());

        container.touch();
        let updated = self.stores.containers.update(&container).await?;
        log::info!("container {} updated", updated.id);
        Ok(updated)
    }

    /// Refused while the container still has child containers
    pub async fn delete(&self, caller: &Caller, id: &ContainerId) -> DomainResult<()> {
        self.stores.accessible_container(caller, id).await?;

        let children = self.stores.containers.get_children(id).await?;
        if !children.is_empty() {
            return Err(DomainError::Conflict(format!(
                "container {} still has {} child container(s)",
                id,
                children.len()
            )));
        }

        self.stores.containers.delete(id.clone()).await?;
        log::info!("container {} deleted", id);
        Ok(())
    }

    async fn check_parent(&self, parent_id: &ContainerId, collection_id: &CollectionId) -> DomainResult<()> {
        let parent = self
            .stores
            .containers
            .find_by_id(parent_id.clone())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Parent container {}", parent_id)))?;

        if !parent.can_have_children() {
            return Err(DomainError::InvalidInput(format!(
                "parent container type {} cannot have children",
                parent.container_type.as_str()
            )));
        }
        if &parent.collection_id != collection_id {
            return Err(DomainError::InvalidInput(
                "parent container must be in the same collection".to_string(),
            ));
        }
        Ok(())
    }

    // Walks up from the new parent; reaching `container` means a loop.
    async fn check_no_cycle(&self, container: &Container, new_parent: &ContainerId) -> DomainResult<()> {
        let siblings = self
            .stores
            .containers
            .list_by_collection(&container.collection_id)
            .await?;
        let parents: HashMap<&ContainerId, Option<&ContainerId>> = siblings
            .iter()
            .map(|c| (&c.id, c.parent_id.as_ref()))
            .collect();

        let mut seen = HashSet::new();
        let mut cursor = Some(new_parent);
        while let Some(id) = cursor {
            if id == &container.id {
                return Err(DomainError::InvalidInput(
                    "container cannot be moved below one of its descendants".to_string(),
                ));
            }
            if !seen.insert(id) {
                break;
            }
            cursor = parents.get(id).copied().flatten();
        }
        Ok(())
    }
}
