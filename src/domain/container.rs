//! Container Entity
//!
//! A physical place objects live in (room, bookshelf, shelf...). Containers
//! form a single-parent hierarchy inside one collection.

use serde::{Deserialize, Serialize};

use super::entity::{now_millis, validate_name, DomainError, DomainResult, Entity};
use super::ids::{CollectionId, ContainerId, GroupId, ObjectId};
use super::object::Object;
use crate::distribution::capacity;

/// Container type determines where it may sit in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    Room,
    Bookshelf,
    Shelf,
    Binder,
    Cabinet,
    /// Default for unspecified type
    #[default]
    General,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Room => "room",
            ContainerType::Bookshelf => "bookshelf",
            ContainerType::Shelf => "shelf",
            ContainerType::Binder => "binder",
            ContainerType::Cabinet => "cabinet",
            ContainerType::General => "general",
        }
    }

    /// Parse a type tag; an empty string means `General`
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "" | "general" => Ok(ContainerType::General),
            "room" => Ok(ContainerType::Room),
            "bookshelf" => Ok(ContainerType::Bookshelf),
            "shelf" => Ok(ContainerType::Shelf),
            "binder" => Ok(ContainerType::Binder),
            "cabinet" => Ok(ContainerType::Cabinet),
            other => Err(DomainError::InvalidInput(format!(
                "invalid container type: {}",
                other
            ))),
        }
    }

    /// Types that hold objects directly, even when they have children
    pub fn is_leaf_type(&self) -> bool {
        matches!(
            self,
            ContainerType::Shelf
                | ContainerType::Binder
                | ContainerType::Cabinet
                | ContainerType::General
        )
    }

    /// Types that may be used as a parent container
    pub fn can_have_children(&self) -> bool {
        matches!(
            self,
            ContainerType::Room | ContainerType::Bookshelf | ContainerType::General
        )
    }
}

/// Inputs for creating a container
#[derive(Debug, Clone, Default)]
pub struct ContainerProps {
    pub collection_id: CollectionId,
    pub name: String,
    pub container_type: ContainerType,
    pub parent_id: Option<ContainerId>,
    pub category_id: Option<String>,
    pub group_id: Option<GroupId>,
    pub location: String,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub rows: Option<u32>,
    pub capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub collection_id: CollectionId,
    pub name: String,
    pub container_type: ContainerType,
    /// Parent container (None = root level)
    pub parent_id: Option<ContainerId>,
    pub category_id: Option<String>,
    pub group_id: Option<GroupId>,
    pub location: String,
    // Physical dimensions for capacity planning
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub rows: Option<u32>,
    /// Explicit capacity in capacity units
    pub capacity: Option<f64>,
    pub objects: Vec<Object>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Container {
    pub fn new(props: ContainerProps) -> DomainResult<Self> {
        let name = validate_name("container", &props.name)?;
        validate_dimensions(props.width, props.depth, props.capacity)?;

        let now = now_millis();
        Ok(Self {
            id: ContainerId::generate(),
            collection_id: props.collection_id,
            name,
            container_type: props.container_type,
            parent_id: props.parent_id,
            category_id: props.category_id,
            group_id: props.group_id,
            location: props.location,
            width: props.width,
            depth: props.depth,
            rows: props.rows,
            capacity: props.capacity,
            objects: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if this is a root container (no parent)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_leaf_container(&self) -> bool {
        self.container_type.is_leaf_type()
    }

    pub fn can_have_children(&self) -> bool {
        self.container_type.can_have_children()
    }

    /// Capacity taken by the objects already stored here
    pub fn used_capacity(&self) -> f64 {
        capacity::used_capacity(self)
    }

    /// Capacity from explicit setting, dimensions, or the fallback
    pub fn total_capacity(&self) -> f64 {
        capacity::total_capacity(self)
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = validate_name("container", name)?;
        self.touch();
        Ok(())
    }

    pub fn update_dimensions(
        &mut self,
        width: Option<f64>,
        depth: Option<f64>,
        rows: Option<u32>,
        capacity: Option<f64>,
    ) -> DomainResult<()> {
        validate_dimensions(width, depth, capacity)?;
        self.width = width;
        self.depth = depth;
        self.rows = rows;
        self.capacity = capacity;
        self.touch();
        Ok(())
    }

    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
        self.touch();
    }

    pub fn get_object(&self, object_id: &ObjectId) -> Option<&Object> {
        self.objects.iter().find(|o| &o.id == object_id)
    }

    pub fn update_object(&mut self, object: Object) -> DomainResult<()> {
        let slot = self
            .objects
            .iter_mut()
            .find(|o| o.id == object.id)
            .ok_or_else(|| object_not_found(&object.id))?;
        *slot = object;
        self.touch();
        Ok(())
    }

    pub fn remove_object(&mut self, object_id: &ObjectId) -> DomainResult<Object> {
        let index = self
            .objects
            .iter()
            .position(|o| &o.id == object_id)
            .ok_or_else(|| object_not_found(object_id))?;
        let removed = self.objects.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

fn object_not_found(id: &ObjectId) -> DomainError {
    DomainError::NotFound(format!("Object {} not found in container", id))
}

fn validate_dimensions(
    width: Option<f64>,
    depth: Option<f64>,
    capacity: Option<f64>,
) -> DomainResult<()> {
    for (label, value) in [("width", width), ("depth", depth), ("capacity", capacity)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(DomainError::InvalidInput(format!(
                    "{} must be a non-negative number",
                    label
                )));
            }
        }
    }
    Ok(())
}

impl Entity for Container {
    type Id = ContainerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
