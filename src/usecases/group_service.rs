//! Group use cases, delegated to the membership provider.

use std::sync::Arc;

use crate::domain::{DomainResult, Group, GroupId};
use crate::services::{Caller, MembershipService};

pub struct GroupService {
    membership: Arc<dyn MembershipService>,
}

impl GroupService {
    pub fn new(membership: Arc<dyn MembershipService>) -> Self {
        Self { membership }
    }

    pub async fn list(&self, caller: &Caller) -> DomainResult<Vec<Group>> {
        self.membership.user_groups(caller).await
    }

    pub async fn create(&self, caller: &Caller, name: &str) -> DomainResult<Group> {
        let group = self.membership.create_group(caller, name).await?;
        log::info!("group {} created by {}", group.id, caller.user_id);
        Ok(group)
    }

    pub async fn get(&self, caller: &Caller, id: &GroupId) -> DomainResult<Group> {
        self.membership.get_group(caller, id).await
    }
}
