//! Repository Layer
//!
//! Data access abstractions and implementations.

mod collection_repo;
mod container;
mod db;
mod traits;


pub use collection_repo::CollectionRepository;
pub use container::ContainerRepository;
pub use db::{init_db, DbState, SharedConnection};
pub use traits::{
    CollectionQueries, CollectionStore, ContainerQueries, ContainerStore, Repository,
};
