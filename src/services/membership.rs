//! Group Membership
//!
//! Groups and their members belong to the identity provider. This module
//! only describes what the use cases need from it, plus a process-local
//! implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::{DomainError, DomainResult, Group, GroupId, UserId};

/// An already-authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: UserId,
    /// Bearer token forwarded to the identity provider
    #[serde(default)]
    pub token: String,
}

impl Caller {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: UserId::from(user_id),
            token: String::new(),
        }
    }
}

#[async_trait]
pub trait MembershipService: Send + Sync {
    /// Groups the caller belongs to
    async fn user_groups(&self, caller: &Caller) -> DomainResult<Vec<Group>>;

    /// Create a group with the caller as its first member
    async fn create_group(&self, caller: &Caller, name: &str) -> DomainResult<Group>;

    /// Fetch a group the caller belongs to
    async fn get_group(&self, caller: &Caller, id: &GroupId) -> DomainResult<Group>;
}

#[derive(Default)]
struct Directory {
    groups: HashMap<GroupId, Group>,
    members: HashMap<GroupId, HashSet<UserId>>,
}

/// Membership kept in process memory
#[derive(Default)]
pub struct InMemoryMembership {
    directory: RwLock<Directory>,
}

impl InMemoryMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing provider group
    pub async fn insert_group(&self, group: Group) {
        let mut directory = self.directory.write().await;
        directory.members.entry(group.id.clone()).or_default();
        directory.groups.insert(group.id.clone(), group);
    }

    pub async fn add_member(&self, group_id: &GroupId, user_id: &UserId) -> DomainResult<()> {
        let mut directory = self.directory.write().await;
        if !directory.groups.contains_key(group_id) {
            return Err(DomainError::NotFound(format!("Group {}", group_id)));
        }
        directory
            .members
            .entry(group_id.clone())
            .or_default()
            .insert(user_id.clone());
        Ok(())
    }
}

#[async_trait]
impl MembershipService for InMemoryMembership {
    async fn user_groups(&self, caller: &Caller) -> DomainResult<Vec<Group>> {
        let directory = self.directory.read().await;
        let mut groups: Vec<Group> = directory
            .members
            .iter()
            .filter(|(_, members)| members.contains(&caller.user_id))
            .filter_map(|(id, _)| directory.groups.get(id).cloned())
            .collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(groups)
    }

    async fn create_group(&self, caller: &Caller, name: &str) -> DomainResult<Group> {
        let group = Group::new(GroupId::from(uuid::Uuid::new_v4().to_string().as_str()), name)?;

        let mut directory = self.directory.write().await;
        directory
            .members
            .entry(group.id.clone())
            .or_default()
            .insert(caller.user_id.clone());
        directory.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    async fn get_group(&self, caller: &Caller, id: &GroupId) -> DomainResult<Group> {
        let directory = self.directory.read().await;
        let group = directory
            .groups
            .get(id)
            .ok_or_else(|| DomainError::NotFound(format!("Group {}", id)))?;

        let is_member = directory
            .members
            .get(id)
            .is_some_and(|members| members.contains(&caller.user_id));
        if !is_member {
            return Err(DomainError::AccessDenied(format!(
                "user {} is not a member of group {}",
                caller.user_id, id
            )));
        }
        Ok(group.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creator_is_member() {
        let membership = InMemoryMembership::new();
        let alice = Caller::new("alice");

        let group = membership.create_group(&alice, "Family").await.unwrap();
        assert_eq!(membership.user_groups(&alice).await.unwrap(), vec![group.clone()]);
        assert_eq!(membership.get_group(&alice, &group.id).await.unwrap(), group);
    }

    #[tokio::test]
    async fn test_non_member_denied() {
        let membership = InMemoryMembership::new();
        let group = membership.create_group(&Caller::new("alice"), "Family").await.unwrap();

        let bob = Caller::new("bob");
        assert!(membership.user_groups(&bob).await.unwrap().is_empty());
        assert!(matches!(
            membership.get_group(&bob, &group.id).await,
            Err(DomainError::AccessDenied(_))
        ));

        membership.add_member(&group.id, &bob.user_id).await.unwrap();
        assert!(membership.get_group(&bob, &group.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_group() {
        let membership = InMemoryMembership::new();
        let missing = GroupId::from("missing");

        assert!(matches!(
            membership.get_group(&Caller::new("alice"), &missing).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(membership.add_member(&missing, &UserId::from("alice")).await.is_err());
    }

    #[tokio::test]
    async fn test_create_group_validates_name() {
        let membership = InMemoryMembership::new();
        assert!(membership.create_group(&Caller::new("alice"), "").await.is_err());
    }
}
