use rusqlite::Connection;
use std::path::Path;
use tokio::task;
use crate::error::{Result, NobelnetError};

/// Graph store connection wrapper
pub struct Db {
    path: std::path::PathBuf,
}

impl Db {
    /// Create a new store connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Path the store lives at
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new connection with the store pragmas applied
    pub fn open_connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .map_err(NobelnetError::Database)?;
        apply_pragmas(&conn)?;
        Ok(conn)
    }

    /// Execute a closure with a store connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let mut conn = Connection::open(&path)
                .map_err(NobelnetError::Database)?;
            apply_pragmas(&conn)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            NobelnetError::Config(format!("store task panicked or was cancelled: {}", e))
        })?
    }
}

/// WAL for concurrent readers during import, NORMAL sync for bulk-insert speed,
/// foreign keys so relations cannot outlive their endpoint nodes.
fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL; \
         PRAGMA synchronous = NORMAL; \
         PRAGMA foreign_keys = ON; \
         PRAGMA temp_store = MEMORY;",
    )?;
    Ok(())
}

pub mod migrate;
