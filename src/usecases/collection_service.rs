//! Collection use cases

use serde::Deserialize;
use std::collections::HashSet;

use crate::domain::{
    Collection, CollectionId, CollectionProps, DomainError, DomainResult, FieldUpdate, GroupId,
    ObjectType,
};
use crate::services::{ensure_owner, Caller};

use super::context::Stores;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCollectionInput {
    pub name: String,
    #[serde(default)]
    pub object_type: ObjectType,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub location: String,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollectionInput {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    #[serde(default)]
    pub category_id: FieldUpdate<String>,
    #[serde(default)]
    pub group_id: FieldUpdate<GroupId>,
}

pub struct CollectionService {
    stores: Stores,
}

impl CollectionService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn create(&self, caller: &Caller, input: CreateCollectionInput) -> DomainResult<Collection> {
        if let Some(group_id) = &input.group_id {
            // membership check, errors if the caller is not in the group
            self.stores.membership.get_group(caller, group_id).await?;
        }

        let collection = Collection::new(CollectionProps {
            user_id: caller.user_id.clone(),
            group_id: input.group_id,
            name: input.name,
            category_id: input.category_id,
            object_type: input.object_type,
            tags: input.tags,
            location: input.location,
        })?;

        let created = self.stores.collections.create(&collection).await?;
        log::info!("collection {} created by {}", created.id, caller.user_id);
        Ok(created)
    }

    pub async fn get(&self, caller: &Caller, id: &CollectionId) -> DomainResult<Collection> {
        self.stores.accessible_collection(caller, id).await
    }

    /// Collections the caller owns, then those shared with the caller's groups
    pub async fn list(&self, caller: &Caller) -> DomainResult<Vec<Collection>> {
        let mut collections = self.stores.collections.list_by_owner(&caller.user_id).await?;
        let mut seen: HashSet<CollectionId> = collections.iter().map(|c| c.id.clone()).collect();

        for group in self.stores.membership.user_groups(caller).await? {
            for collection in self.stores.collections.list_by_group(&group.id).await? {
                if seen.insert(collection.id.clone()) {
                    collections.push(collection);
                }
            }
        }
        Ok(collections)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: &CollectionId,
        input: UpdateCollectionInput,
    ) -> DomainResult<Collection> {
        let mut collection = self.stores.accessible_collection(caller, id).await?;

        if let Some(name) = input.name {
            collection.rename(&name)?;
        }
        if let Some(tags) = input.tags {
            collection.tags = tags;
        }
        if let Some(location) = input.location {
            collection.location = location;
        }
        collection.category_id = input.category_id.apply(collection.category_id.take());

        if !input.group_id.is_unset() {
            ensure_owner(&collection, caller)?;
            if let FieldUpdate::Set(group_id) = &input.group_id {
                self.stores.membership.get_group(caller, group_id).await?;
            }
            collection.group_id = input.group_id.apply(collection.group_id.take());
        }

        collection.touch();
        let updated = self.stores.collections.update(&collection).await?;
        log::info!("collection {} updated", updated.id);
        Ok(updated)
    }

    /// Owner only; the collection must have no containers left
    pub async fn delete(&self, caller: &Caller, id: &CollectionId) -> DomainResult<()> {
        let collection = self
            .stores
            .collections
            .find_by_id(id.clone())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Collection {}", id)))?;
        ensure_owner(&collection, caller)?;

        let containers = self.stores.containers.list_by_collection(id).await?;
        if !containers.is_empty() {
            return Err(DomainError::Conflict(format!(
                "collection {} still has {} container(s); remove them first",
                id,
                containers.len()
            )));
        }

        self.stores.collections.delete(id.clone()).await?;
        log::info!("collection {} deleted", id);
        Ok(())
    }
}
