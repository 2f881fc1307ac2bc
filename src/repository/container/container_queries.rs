//! Container Hierarchy Queries

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{CollectionId, Container, ContainerId, DomainResult};
use super::super::db::open_connection;
use super::super::traits::ContainerQueries;
use super::container_repo::{collect_containers, ContainerRepository, ContainerRow, CONTAINER_COLUMNS};

#[async_trait]
impl ContainerQueries for ContainerRepository {
    async fn list_by_collection(&self, collection_id: &CollectionId) -> DomainResult<Vec<Container>> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM containers WHERE collection_id = ? ORDER BY seq",
            CONTAINER_COLUMNS
        ))?;
        let rows = stmt.query_map(params![collection_id.as_str()], ContainerRow::read)?;
        collect_containers(rows)
    }

    async fn get_children(&self, parent_id: &ContainerId) -> DomainResult<Vec<Container>> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM containers WHERE parent_id = ? ORDER BY seq",
            CONTAINER_COLUMNS
        ))?;
        let rows = stmt.query_map(params![parent_id.as_str()], ContainerRow::read)?;
        collect_containers(rows)
    }
}
