//! Collection Repository
//!
//! SQLite-backed collections. Tags are stored as a JSON array column.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{
    Collection, CollectionId, DomainError, DomainResult, GroupId, ObjectType, UserId,
};
use super::db::{open_connection, SharedConnection};
use super::traits::{CollectionQueries, Repository};

const COLLECTION_COLUMNS: &str = "id, user_id, group_id, name, category_id, object_type, tags, location, created_at, updated_at";

pub struct CollectionRepository {
    conn: SharedConnection,
}

impl CollectionRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    async fn select_where(&self, filter: &str, value: &str) -> DomainResult<Vec<Collection>> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM collections WHERE {} = ? ORDER BY seq",
            COLLECTION_COLUMNS, filter
        ))?;
        let rows = stmt.query_map(params![value], CollectionRow::read)?;
        collect_collections(rows)
    }
}

#[async_trait]
impl Repository<Collection> for CollectionRepository {
    async fn create(&self, entity: &Collection) -> DomainResult<Collection> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        conn.execute(
            &format!(
                "INSERT INTO collections ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                COLLECTION_COLUMNS
            ),
            params![
                entity.id.as_str(),
                entity.user_id.as_str(),
                entity.group_id.as_ref().map(|g| g.as_str()),
                entity.name,
                entity.category_id,
                entity.object_type.as_str(),
                serde_json::to_string(&entity.tags)?,
                entity.location,
                entity.created_at,
                entity.updated_at,
            ],
        )?;

        Ok(entity.clone())
    }

    async fn find_by_id(&self, id: CollectionId) -> DomainResult<Option<Collection>> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        conn.query_row(
            &format!("SELECT {} FROM collections WHERE id = ?", COLLECTION_COLUMNS),
            params![id.as_str()],
            CollectionRow::read,
        )
        .optional()?
        .map(CollectionRow::into_collection)
        .transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Collection>> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM collections ORDER BY seq",
            COLLECTION_COLUMNS
        ))?;
        let rows = stmt.query_map([], CollectionRow::read)?;
        collect_collections(rows)
    }

    async fn update(&self, entity: &Collection) -> DomainResult<Collection> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let changed = conn.execute(
            "UPDATE collections SET group_id = ?, name = ?, category_id = ?, object_type = ?, tags = ?, location = ?, updated_at = ? WHERE id = ?",
            params![
                entity.group_id.as_ref().map(|g| g.as_str()),
                entity.name,
                entity.category_id,
                entity.object_type.as_str(),
                serde_json::to_string(&entity.tags)?,
                entity.location,
                entity.updated_at,
                entity.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(DomainError::NotFound(format!("Collection {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: CollectionId) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = open_connection(&guard)?;

        let changed = conn.execute("DELETE FROM collections WHERE id = ?", params![id.as_str()])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Collection {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionQueries for CollectionRepository {
    async fn list_by_owner(&self, user_id: &UserId) -> DomainResult<Vec<Collection>> {
        self.select_where("user_id", user_id.as_str()).await
    }

    async fn list_by_group(&self, group_id: &GroupId) -> DomainResult<Vec<Collection>> {
        self.select_where("group_id", group_id.as_str()).await
    }
}

struct CollectionRow {
    id: String,
    user_id: String,
    group_id: Option<String>,
    name: String,
    category_id: Option<String>,
    object_type: String,
    tags: String,
    location: String,
    created_at: i64,
    updated_at: i64,
}

impl CollectionRow {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            group_id: row.get(2)?,
            name: row.get(3)?,
            category_id: row.get(4)?,
            object_type: row.get(5)?,
            tags: row.get(6)?,
            location: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_collection(self) -> DomainResult<Collection> {
        Ok(Collection {
            id: CollectionId::from(self.id.as_str()),
            user_id: UserId::from(self.user_id.as_str()),
            group_id: self.group_id.as_deref().map(GroupId::from),
            name: self.name,
            category_id: self.category_id,
            object_type: ObjectType::parse(&self.object_type)
                .map_err(|e| DomainError::Internal(e.to_string()))?,
            tags: serde_json::from_str(&self.tags)?,
            location: self.location,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn collect_collections<I>(rows: I) -> DomainResult<Vec<Collection>>
where
    I: Iterator<Item = rusqlite::Result<CollectionRow>>,
{
    rows.map(|row| row.map_err(DomainError::from).and_then(CollectionRow::into_collection))
        .collect()
}
