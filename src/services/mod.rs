//! External Collaborators
//!
//! Identity-provider facing interfaces and the access rule built on them.

mod access;
mod membership;

pub use access::{check_collection_access, ensure_collection_access, ensure_owner};
pub use membership::{Caller, InMemoryMembership, MembershipService};
