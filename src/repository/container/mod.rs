//! Container Repository Module
//!
//! - container_repo: Core CRUD operations
//! - container_queries: Lookups by collection and parent

mod container_queries;
mod container_repo;

pub use container_repo::ContainerRepository;
