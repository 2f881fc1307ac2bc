//! Container Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Container CRUD operations.
//! A container's objects live in a JSON column on its row, so persisting a
//! container and everything in it is a single statement.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{
    CollectionId, Container, ContainerId, ContainerType, DomainError, DomainResult, GroupId,
    Object,
};
use super::super::db::{open_connection, SharedConnection};
use super::super::traits::Repository;

pub(super) const CONTAINER_COLUMNS: &str = "id, collection_id, name, container_type, parent_id, category_id, group_id, location, width, depth, row_count, capacity, objects, created_at, updated_at";

/// SQLite implementation of Container repository
pub struct ContainerRepository {
    pub(super) conn: SharedConnection,
}

impl ContainerRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Container> for ContainerRepository {
    async fn create(&self, entity: &Container) -> DomainResult<Container> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        conn.execute(
            &format!(
                "INSERT INTO containers ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                CONTAINER_COLUMNS
            ),
            params![
                entity.id.as_str(),
                entity.collection_id.as_str(),
                entity.name,
                entity.container_type.as_str(),
                entity.parent_id.as_ref().map(|p| p.as_str()),
                entity.category_id,
                entity.group_id.as_ref().map(|g| g.as_str()),
                entity.location,
                entity.width,
                entity.depth,
                entity.rows,
                entity.capacity,
                serde_json::to_string(&entity.objects)?,
                entity.created_at,
                entity.updated_at,
            ],
        )?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: ContainerId) -> DomainResult<Option<Container>> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let row = conn
            .query_row(
                &format!("SELECT {} FROM containers WHERE id = ?", CONTAINER_COLUMNS),
                params![id.as_str()],
                ContainerRow::read,
            )
            .optional()?;

        row.map(ContainerRow::into_container).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Container>> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM containers ORDER BY seq",
            CONTAINER_COLUMNS
        ))?;
        let rows = stmt.query_map([], ContainerRow::read)?;
        collect_containers(rows)
    }

    async fn update(&self, entity: &Container) -> DomainResult<Container> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let changed = conn.execute(
            "UPDATE containers SET name = ?, container_type = ?, parent_id = ?, category_id = ?, group_id = ?, location = ?, width = ?, depth = ?, row_count = ?, capacity = ?, objects = ?, updated_at = ? WHERE id = ?",
            params![
                entity.name,
                entity.container_type.as_str(),
                entity.parent_id.as_ref().map(|p| p.as_str()),
                entity.category_id,
                entity.group_id.as_ref().map(|g| g.as_str()),
                entity.location,
                entity.width,
                entity.depth,
                entity.rows,
                entity.capacity,
                serde_json::to_string(&entity.objects)?,
                entity.updated_at,
                entity.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Container {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: ContainerId) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let changed = conn.execute("DELETE FROM containers WHERE id = ?", params![id.as_str()])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Container {}", id)));
        }
        Ok(())
    }
}

/// Raw column values; decoding of tags and JSON happens outside the row callback
pub(super) struct ContainerRow {
    id: String,
    collection_id: String,
    name: String,
    container_type: String,
    parent_id: Option<String>,
    category_id: Option<String>,
    group_id: Option<String>,
    location: String,
    width: Option<f64>,
    depth: Option<f64>,
    rows: Option<u32>,
    capacity: Option<f64>,
    objects: String,
    created_at: i64,
    updated_at: i64,
}

impl ContainerRow {
    pub(super) fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            collection_id: row.get(1)?,
            name: row.get(2)?,
            container_type: row.get(3)?,
            parent_id: row.get(4)?,
            category_id: row.get(5)?,
            group_id: row.get(6)?,
            location: row.get(7)?,
            width: row.get(8)?,
            depth: row.get(9)?,
            rows: row.get(10)?,
            capacity: row.get(11)?,
            objects: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }

    pub(super) fn into_container(self) -> DomainResult<Container> {
        let objects: Vec<Object> = serde_json::from_str(&self.objects)?;
        Ok(Container {
            id: ContainerId::from(self.id.as_str()),
            collection_id: CollectionId::from(self.collection_id.as_str()),
            name: self.name,
            container_type: ContainerType::parse(&self.container_type)
                .map_err(|e| DomainError::Internal(e.to_string()))?,
            parent_id: self.parent_id.as_deref().map(ContainerId::from),
            category_id: self.category_id,
            group_id: self.group_id.as_deref().map(GroupId::from),
            location: self.location,
            width: self.width,
            depth: self.depth,
            rows: self.rows,
            capacity: self.capacity,
            objects,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(super) fn collect_containers<I>(rows: I) -> DomainResult<Vec<Container>>
where
    I: Iterator<Item = rusqlite::Result<ContainerRow>>,
{
    rows.map(|row| row.map_err(DomainError::from).and_then(ContainerRow::into_container))
        .collect()
}
