//! Use Case Layer
//!
//! Access-checked operations over the repositories, one service per entity
//! plus the bulk import executor.

mod bulk_import;
mod collection_service;
mod container_service;
mod context;
mod group_service;
mod object_service;

#[cfg(test)]
pub(crate) mod testing;

pub use bulk_import::{
    BulkImportRequest, BulkImportResponse, BulkImportService, DistributionMode,
    DEFAULT_CONTAINER_NAME,
};
pub use collection_service::{CollectionService, CreateCollectionInput, UpdateCollectionInput};
pub use container_service::{ContainerService, CreateContainerInput, UpdateContainerInput};
pub use context::Stores;
pub use group_service::GroupService;
pub use object_service::{CreateObjectInput, ObjectService, UpdateObjectInput};
