//! Collection Entity
//!
//! A user-owned (optionally group-shared) catalogue of one kind of object.
//! Its containers are looked up by collection id rather than embedded.

use serde::{Deserialize, Serialize};

use super::entity::{now_millis, validate_name, DomainResult, Entity};
use super::ids::{CollectionId, GroupId, UserId};
use super::object::ObjectType;

#[derive(Debug, Clone, Default)]
pub struct CollectionProps {
    pub user_id: UserId,
    pub group_id: Option<GroupId>,
    pub name: String,
    pub category_id: Option<String>,
    pub object_type: ObjectType,
    pub tags: Vec<String>,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    /// Owner of the collection
    pub user_id: UserId,
    /// Group the collection is shared with
    pub group_id: Option<GroupId>,
    pub name: String,
    pub category_id: Option<String>,
    pub object_type: ObjectType,
    pub tags: Vec<String>,
    pub location: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Collection {
    pub fn new(props: CollectionProps) -> DomainResult<Self> {
        let name = validate_name("collection", &props.name)?;
        let now = now_millis();
        Ok(Self {
            id: CollectionId::generate(),
            user_id: props.user_id,
            group_id: props.group_id,
            name,
            category_id: props.category_id,
            object_type: props.object_type,
            tags: props.tags,
            location: props.location,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = validate_name("collection", name)?;
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

impl Entity for Collection {
    type Id = CollectionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
