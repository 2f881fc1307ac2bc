//! Group Entity
//!
//! Lightweight mirror of an identity-provider group used for sharing
//! collections. Membership itself lives with the provider.

use serde::{Deserialize, Serialize};

use super::entity::{validate_name, DomainResult, Entity};
use super::ids::GroupId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

impl Group {
    pub fn new(id: GroupId, name: &str) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: validate_name("group", name)?,
        })
    }
}

impl Entity for Group {
    type Id = GroupId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
