//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod collection;
mod container;
mod entity;
mod field;
mod group;
mod ids;
mod object;

pub use collection::{Collection, CollectionProps};
pub use container::{Container, ContainerProps, ContainerType};
pub use entity::{now_millis, validate_name, DomainError, DomainResult, Entity, MAX_NAME_LEN};
pub use field::FieldUpdate;
pub use group::Group;
pub use ids::{CollectionId, ContainerId, GroupId, ObjectId, UserId};
pub use object::{Object, ObjectProps, ObjectType, Properties};
