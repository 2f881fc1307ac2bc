//! Collection access rule: owners and members of the collection's group.

use crate::domain::{Collection, DomainError, DomainResult, Group};

use super::membership::{Caller, MembershipService};

/// Check access given the caller's groups
pub fn ensure_collection_access(
    collection: &Collection,
    caller: &Caller,
    caller_groups: &[Group],
) -> DomainResult<()> {
    if collection.is_owned_by(&caller.user_id) {
        return Ok(());
    }
    let shared = collection
        .group_id
        .as_ref()
        .is_some_and(|group_id| caller_groups.iter().any(|g| &g.id == group_id));
    if shared {
        return Ok(());
    }
    Err(DomainError::AccessDenied(format!(
        "user {} cannot access collection {}",
        caller.user_id, collection.id
    )))
}

/// Like `ensure_collection_access`, asking the provider for groups only
/// when the caller is not the owner
pub async fn check_collection_access(
    membership: &dyn MembershipService,
    caller: &Caller,
    collection: &Collection,
) -> DomainResult<()> {
    if collection.is_owned_by(&caller.user_id) || collection.group_id.is_none() {
        return ensure_collection_access(collection, caller, &[]);
    }
    let groups = membership.user_groups(caller).await?;
    ensure_collection_access(collection, caller, &groups)
}

pub fn ensure_owner(collection: &Collection, caller: &Caller) -> DomainResult<()> {
    if collection.is_owned_by(&caller.user_id) {
        Ok(())
    } else {
        Err(DomainError::AccessDenied(format!(
            "only the owner can do this to collection {}",
            collection.id
        )))
    }
}
