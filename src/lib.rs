//! Nishiki Core
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and SQLite implementations
//! - distribution: Capacity-aware planner for bulk imports
//! - services: Identity-provider collaborators and access rules
//! - usecases: Access-checked operations, including bulk import
//! - commands: Thin handlers over the use cases

use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod distribution;
pub mod domain;
pub mod repository;
pub mod services;
pub mod usecases;

use config::AppConfig;
use domain::{DomainError, DomainResult};
use repository::{init_db, CollectionRepository, ContainerRepository, DbState};
use services::InMemoryMembership;
use usecases::{
    BulkImportService, CollectionService, ContainerService, GroupService, ObjectService, Stores,
};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub config: AppConfig,
    pub collections: CollectionService,
    pub containers: ContainerService,
    pub objects: ObjectService,
    pub groups: GroupService,
    pub bulk_import: BulkImportService,
}

impl AppState {
    pub fn new(db_state: DbState, config: AppConfig, stores: Stores) -> Self {
        Self {
            db_state,
            config,
            collections: CollectionService::new(stores.clone()),
            containers: ContainerService::new(stores.clone()),
            objects: ObjectService::new(stores.clone()),
            groups: GroupService::new(stores.membership.clone()),
            bulk_import: BulkImportService::new(stores),
        }
    }
}

/// Set up logging, open the database and wire the services
pub async fn init_app(config: AppConfig) -> DomainResult<AppState> {
    if let Some(log_dir) = &config.log_dir {
        rolling_logger::init_logger(log_dir.clone(), &config.app_name)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
    }

    let db_state = init_db(&config.db_path).await?;
    let stores = Stores::new(
        Arc::new(CollectionRepository::new(db_state.connection())),
        Arc::new(ContainerRepository::new(db_state.connection())),
        Arc::new(InMemoryMembership::new()),
    );

    log::info!("{} initialized", config.app_name);
    Ok(AppState::new(db_state, config, stores))
}
