//! Import run bookkeeping: source fingerprints and history.
//!
//! Each completed import records the SHA256 of the relations file it read,
//! so re-running against an unchanged staging directory can be skipped.

use chrono::Utc;
use rusqlite::params;
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

use crate::db::Db;
use crate::error::{NobelnetError, Result};

/// One recorded import run.
#[derive(Debug, Clone)]
pub struct ImportRun {
    pub run_id: String,
    pub source_path: String,
    pub source_hash: String,
    pub node_count: usize,
    pub relation_count: usize,
    pub imported_at: String,
}

/// Compute SHA256 hash of file contents
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(NobelnetError::Io)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let hash = hasher.finalize();
    Ok(format!("{:x}", hash))
}

/// Source hash of the most recent run for `source_path`, if any.
pub async fn last_run_hash(db: &Db, source_path: &str) -> Result<Option<String>> {
    let source_path = source_path.to_string();
    db.with_connection(move |conn| {
        let hash = conn
            .query_row(
                "SELECT source_hash FROM import_runs WHERE source_path = ?1 \
                 ORDER BY imported_at DESC LIMIT 1",
                params![source_path],
                |row| row.get::<_, String>(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        Ok::<Option<String>, NobelnetError>(hash)
    })
    .await
}

/// Record a completed import run. Returns the run id.
pub async fn record_run(
    db: &Db,
    source_path: &str,
    source_hash: &str,
    node_count: usize,
    relation_count: usize,
) -> Result<String> {
    let run_id = Uuid::new_v4().to_string();
    let run_id_clone = run_id.clone();
    let source_path = source_path.to_string();
    let source_hash = source_hash.to_string();
    let imported_at = Utc::now().to_rfc3339();

    db.with_connection(move |conn| {
        conn.execute(
            "INSERT INTO import_runs \
                 (run_id, source_path, source_hash, node_count, relation_count, imported_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run_id_clone,
                source_path,
                source_hash,
                node_count as i64,
                relation_count as i64,
                imported_at,
            ],
        )?;
        Ok(())
    })
    .await?;

    Ok(run_id)
}

/// Most recent runs, newest first.
pub async fn run_history(db: &Db, limit: usize) -> Result<Vec<ImportRun>> {
    db.with_connection(move |conn| {
        let mut stmt = conn.prepare(
            "SELECT run_id, source_path, source_hash, node_count, relation_count, imported_at \
             FROM import_runs ORDER BY imported_at DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ImportRun {
                    run_id: row.get(0)?,
                    source_path: row.get(1)?,
                    source_hash: row.get(2)?,
                    node_count: row.get::<_, i64>(3)? as usize,
                    relation_count: row.get::<_, i64>(4)? as usize,
                    imported_at: row.get(5)?,
                })
            })
            .map_err(NobelnetError::Database)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(NobelnetError::Database)?);
        }
        Ok(out)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn setup_store() -> (Db, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Db::new(&db_path);
        let migrations_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
        db.with_connection(move |conn| migrate::run_migrations(conn, &migrations_dir))
            .await
            .unwrap();
        (db, temp_dir)
    }

    #[test]
    fn test_compute_file_hash_changes_with_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Relations.csv");
        fs::write(&path, "a,b,c\n").unwrap();
        let h1 = compute_file_hash(&path).unwrap();
        fs::write(&path, "a,b,d\n").unwrap();
        let h2 = compute_file_hash(&path).unwrap();
        assert_ne!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[tokio::test]
    async fn test_record_and_query_runs() {
        let (db, _temp) = setup_store().await;

        assert_eq!(last_run_hash(&db, "staging/Relations.csv").await.unwrap(), None);

        record_run(&db, "staging/Relations.csv", "hash1", 10, 20)
            .await
            .unwrap();
        assert_eq!(
            last_run_hash(&db, "staging/Relations.csv").await.unwrap(),
            Some("hash1".to_string())
        );

        let history = run_history(&db, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].node_count, 10);
        assert_eq!(history[0].relation_count, 20);
    }

    #[tokio::test]
    async fn test_last_run_hash_is_per_source() {
        let (db, _temp) = setup_store().await;
        record_run(&db, "a/Relations.csv", "hash-a", 1, 1).await.unwrap();
        assert_eq!(last_run_hash(&db, "b/Relations.csv").await.unwrap(), None);
    }
}
