//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection slot; `None` until `init_db` has run
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone, Default)]
pub struct DbState {
    conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for repositories; all clones share one connection
    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub async fn is_initialized(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection. Repositories fail with `Internal` afterwards.
    pub async fn close(&self) {
        self.conn.lock().await.take();
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => DomainError::Conflict(e.to_string()),
            _ => DomainError::Internal(e.to_string()),
        }
    }
}

/// Borrow the open connection out of a locked slot
pub(crate) fn open_connection(slot: &Option<Connection>) -> DomainResult<&Connection> {
    slot.as_ref()
        .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))
}

/// Open (or create) the database at `db_path` and run migrations.
///
/// `":memory:"` gives a private in-memory database.
pub async fn init_db(db_path: impl AsRef<Path>) -> DomainResult<DbState> {
    let db_path = db_path.as_ref();
    let conn = Connection::open(db_path)?;
    run_migrations(&conn)?;

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    log::info!("database ready at {}", db_path.display());
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS collections (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            user_id TEXT NOT NULL,
            group_id TEXT,
            name TEXT NOT NULL,
            category_id TEXT,
            object_type TEXT NOT NULL DEFAULT 'general',
            tags TEXT NOT NULL DEFAULT '[]',
            location TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS containers (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            collection_id TEXT NOT NULL,
            name TEXT NOT NULL,
            container_type TEXT NOT NULL DEFAULT 'general',
            parent_id TEXT,
            category_id TEXT,
            group_id TEXT,
            location TEXT NOT NULL DEFAULT '',
            width REAL,
            depth REAL,
            row_count INTEGER,
            objects TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );",
    )?;

    // Explicit capacity came after dimensions
    if !column_exists(conn, "containers", "capacity")? {
        conn.execute("ALTER TABLE containers ADD COLUMN capacity REAL", [])?;
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_collections_user ON collections(user_id);
        CREATE INDEX IF NOT EXISTS idx_collections_group ON collections(group_id);
        CREATE INDEX IF NOT EXISTS idx_containers_collection ON containers(collection_id);
        CREATE INDEX IF NOT EXISTS idx_containers_parent ON containers(parent_id);",
    )?;

    Ok(())
}
