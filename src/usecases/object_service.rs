//! Object use cases
//!
//! Objects live inside their container's row, so every change here is a
//! read-modify-write of one container.

use serde::Deserialize;

use crate::domain::{
    CollectionId, ContainerId, DomainError, DomainResult, FieldUpdate, Object, ObjectId, ObjectProps,
    ObjectType, Properties,
};
use crate::services::Caller;

use super::context::Stores;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateObjectInput {
    pub name: String,
    /// Defaults to the collection's object type
    pub object_type: Option<ObjectType>,
    #[serde(default)]
    pub description: String,
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub tags: Vec<String>,
    pub expires_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateObjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: FieldUpdate<f64>,
    pub unit: Option<String>,
    /// Replaces the whole property bag
    pub properties: Option<Properties>,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub expires_at: FieldUpdate<i64>,
}

pub struct ObjectService {
    stores: Stores,
}

impl ObjectService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        container_id: &ContainerId,
        input: CreateObjectInput,
    ) -> DomainResult<Object> {
        let (mut container, collection) = self.stores.accessible_container(caller, container_id).await?;

        let object = Object::new(ObjectProps {
            name: input.name,
            description: input.description,
            object_type: input.object_type.unwrap_or(collection.object_type),
            quantity: input.quantity,
            unit: input.unit,
            properties: input.properties,
            tags: input.tags,
            expires_at: input.expires_at,
        })?;

        container.add_object(object.clone());
        self.stores.containers.update(&container).await?;
        log::info!("object {} added to container {}", object.id, container.id);
        Ok(object)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        container_id: &ContainerId,
        object_id: &ObjectId,
        input: UpdateObjectInput,
    ) -> DomainResult<Object> {
        let (mut container, _) = self.stores.accessible_container(caller, container_id).await?;
        let mut object = container
            .get_object(object_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Object {}", object_id)))?;

        if let Some(name) = &input.name {
            object.rename(name)?;
        }
        if let Some(description) = input.description {
            object.description = description;
        }
        if !input.quantity.is_unset() {
            object.set_quantity(input.quantity.apply(object.quantity))?;
        }
        if let Some(unit) = input.unit {
            object.unit = unit;
        }
        if let Some(properties) = input.properties {
            object.properties = properties;
        }
        if let Some(tags) = input.tags {
            object.tags = tags;
        }
        object.expires_at = input.expires_at.apply(object.expires_at);
        object.touch();

        container.update_object(object.clone())?;
        self.stores.containers.update(&container).await?;
        log::info!("object {} updated", object.id);
        Ok(object)
    }

    pub async fn delete(
        &self,
        caller: &Caller,
        container_id: &ContainerId,
        object_id: &ObjectId,
    ) -> DomainResult<()> {
        let (mut container, _) = self.stores.accessible_container(caller, container_id).await?;
        container.remove_object(object_id)?;
        self.stores.containers.update(&container).await?;
        log::info!("object {} removed from container {}", object_id, container_id);
        Ok(())
    }

    /// Every object of a collection, container by container
    pub async fn list_by_collection(
        &self,
        caller: &Caller,
        collection_id: &CollectionId,
    ) -> DomainResult<Vec<Object>> {
        self.stores.accessible_collection(caller, collection_id).await?;
        let containers = self.stores.containers.list_by_collection(collection_id).await?;
        Ok(containers.into_iter().flat_map(|c| c.objects).collect())
    }
}
