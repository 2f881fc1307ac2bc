//! Entity identifiers
//!
//! String newtypes so ids of different entities cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{DomainError, DomainResult};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an id, rejecting empty strings
            pub fn parse(value: &str) -> DomainResult<Self> {
                let value = value.trim();
                if value.is_empty() {
                    return Err(DomainError::InvalidInput(format!("invalid {} ID", $label)));
                }
                Ok(Self(value.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Collection identifier (UUID v4)
    CollectionId,
    "collection"
);
string_id!(
    /// Container identifier (UUID v4)
    ContainerId,
    "container"
);
string_id!(
    /// Object identifier (UUID v4)
    ObjectId,
    "object"
);
string_id!(
    /// Group identifier, issued by the identity provider
    GroupId,
    "group"
);
string_id!(
    /// User identifier, issued by the identity provider
    UserId,
    "user"
);

fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl CollectionId {
    pub fn generate() -> Self {
        Self(new_uuid())
    }
}

impl ContainerId {
    pub fn generate() -> Self {
        Self(new_uuid())
    }
}

impl ObjectId {
    pub fn generate() -> Self {
        Self(new_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ContainerId::generate(), ContainerId::generate());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(CollectionId::parse("  ").is_err());
        assert_eq!(GroupId::parse("family").unwrap().as_str(), "family");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = ObjectId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
