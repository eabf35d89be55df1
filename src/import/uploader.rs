//! Batched upserts of nodes and relations into the graph store.

use rusqlite::params;
use uuid::Uuid;

use crate::db::Db;
use crate::error::{NobelnetError, Result};
use crate::extract::records::{
    AwardRecord, AwardStatementRecord, NamedRecord, PersonRecord, RelationRow,
};
use crate::schema;

/// Flattened node row matching the store's `nodes` table.
#[derive(Debug, Clone, Default)]
pub struct NodeUpsert {
    pub label: String,
    pub name: String,
    pub wikidata_id: Option<String>,
    pub family_name: Option<String>,
    pub gender: Option<String>,
    pub born_on_date: Option<String>,
    pub died_on_date: Option<String>,
    pub notable_work: Option<String>,
    pub award_year: Option<String>,
    pub motivation: Option<String>,
}

impl NodeUpsert {
    pub fn person(record: PersonRecord) -> Self {
        Self {
            label: schema::PERSON.to_string(),
            name: record.name,
            wikidata_id: record.id,
            family_name: record.family_name,
            gender: record.gender,
            born_on_date: record.born_on_date,
            died_on_date: record.died_on_date,
            notable_work: record.notable_work,
            ..Default::default()
        }
    }

    pub fn award(record: AwardRecord) -> Self {
        Self {
            label: schema::AWARD.to_string(),
            name: record.name,
            wikidata_id: record.id,
            ..Default::default()
        }
    }

    pub fn statement(record: AwardStatementRecord) -> Self {
        Self {
            label: schema::AWARD_STATEMENT.to_string(),
            name: record.name,
            award_year: record.year,
            motivation: record.motivation,
            ..Default::default()
        }
    }

    pub fn named(label: &str, record: NamedRecord) -> Self {
        Self {
            label: label.to_string(),
            name: record.name,
            ..Default::default()
        }
    }
}

/// Outcome of a relation upload.
#[derive(Debug, Default)]
pub struct RelationImportSummary {
    pub imported: usize,
    /// Rows whose endpoint node was absent from the store; skipped and
    /// counted, the batch keeps going.
    pub missing_endpoints: usize,
}

/// Remove all nodes and relations. Run history is kept.
pub async fn clear_store(db: &Db) -> Result<()> {
    db.with_connection(|conn| {
        conn.execute("DELETE FROM relations", [])?;
        conn.execute("DELETE FROM nodes", [])?;
        Ok(())
    })
    .await?;
    log::info!("Cleared all nodes and relations");
    Ok(())
}

/// Upsert node rows in batches. Rows with a blank name are skipped and
/// counted against the returned total.
pub async fn upsert_nodes(db: &Db, rows: Vec<NodeUpsert>, batch_size: usize) -> Result<usize> {
    if rows.is_empty() {
        return Ok(0);
    }

    let count = db
        .with_connection(move |conn| {
            let mut count = 0usize;
            for batch in rows.chunks(batch_size) {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO nodes (label, name, wikidata_id, family_name, gender, \
                                            born_on_date, died_on_date, notable_work, \
                                            award_year, motivation) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
                         ON CONFLICT(label, name) DO UPDATE SET \
                             wikidata_id = COALESCE(excluded.wikidata_id, wikidata_id), \
                             family_name = COALESCE(excluded.family_name, family_name), \
                             gender = COALESCE(excluded.gender, gender), \
                             born_on_date = COALESCE(excluded.born_on_date, born_on_date), \
                             died_on_date = COALESCE(excluded.died_on_date, died_on_date), \
                             notable_work = COALESCE(excluded.notable_work, notable_work), \
                             award_year = COALESCE(excluded.award_year, award_year), \
                             motivation = COALESCE(excluded.motivation, motivation)",
                    )?;
                    for row in batch {
                        if row.name.trim().is_empty() {
                            log::warn!("Skipping {} node with blank name", row.label);
                            continue;
                        }
                        stmt.execute(params![
                            row.label,
                            row.name,
                            row.wikidata_id,
                            row.family_name,
                            row.gender,
                            row.born_on_date,
                            row.died_on_date,
                            row.notable_work,
                            row.award_year,
                            row.motivation,
                        ])?;
                        count += 1;
                    }
                }
                tx.commit()?;
            }
            Ok::<usize, NobelnetError>(count)
        })
        .await?;

    Ok(count)
}

/// Upload relation rows in batches.
///
/// Every relation label is resolved against the relation schema before any
/// row is written, so an unknown label fails the import instead of being
/// dropped. Endpoints are matched by (label, name); a row whose endpoint
/// node does not exist is skipped and counted.
pub async fn import_relations(
    db: &Db,
    rows: Vec<RelationRow>,
    batch_size: usize,
) -> Result<RelationImportSummary> {
    // Resolve all labels up front
    let mut resolved = Vec::with_capacity(rows.len());
    for row in rows {
        let rule = schema::rule_for(&row.relation)?;
        resolved.push((row, rule));
    }

    let summary = db
        .with_connection(move |conn| {
            let mut summary = RelationImportSummary::default();
            for batch in resolved.chunks(batch_size) {
                let tx = conn.transaction()?;
                {
                    let mut lookup = tx.prepare(
                        "SELECT node_id FROM nodes WHERE label = ?1 AND name = ?2",
                    )?;
                    let mut insert = tx.prepare(
                        "INSERT OR IGNORE INTO relations (relation_id, start_id, relation, end_id) \
                         VALUES (?1, ?2, ?3, ?4)",
                    )?;
                    for (row, rule) in batch {
                        let start_id: Option<i64> = lookup
                            .query_row(params![rule.start_label, row.start_id], |r| r.get(0))
                            .map(Some)
                            .or_else(ignore_not_found)?;
                        let end_id: Option<i64> = lookup
                            .query_row(params![rule.end_label, row.end_name], |r| r.get(0))
                            .map(Some)
                            .or_else(ignore_not_found)?;

                        let (Some(start_id), Some(end_id)) = (start_id, end_id) else {
                            summary.missing_endpoints += 1;
                            log::warn!(
                                "Skipping {} relation {:?} -> {:?}: endpoint not in store",
                                row.relation,
                                row.start_id,
                                row.end_name
                            );
                            continue;
                        };

                        insert.execute(params![
                            Uuid::new_v4().to_string(),
                            start_id,
                            row.relation,
                            end_id,
                        ])?;
                        summary.imported += 1;
                    }
                }
                tx.commit()?;
            }
            Ok::<RelationImportSummary, NobelnetError>(summary)
        })
        .await?;

    log::info!(
        "Imported {} relations ({} skipped for missing endpoints)",
        summary.imported,
        summary.missing_endpoints
    );
    Ok(summary)
}

fn ignore_not_found(e: rusqlite::Error) -> std::result::Result<Option<i64>, rusqlite::Error> {
    match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate;
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

    fn person(name: &str, id: &str) -> NodeUpsert {
        NodeUpsert::person(PersonRecord {
            name: name.to_string(),
            id: Some(id.to_string()),
            ..Default::default()
        })
    }

    fn statement(name: &str) -> NodeUpsert {
        NodeUpsert::statement(AwardStatementRecord {
            name: name.to_string(),
            year: Some("1903".to_string()),
            motivation: None,
        })
    }

    async fn node_count(db: &Db) -> i64 {
        db.with_connection(|conn| {
            let c: i64 = conn.query_row("SELECT COUNT(*) FROM nodes", [], |r| r.get(0))?;
            Ok::<i64, NobelnetError>(c)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_nodes_dedups_on_identity() {
        let (db, _temp) = setup_store().await;

        let n = upsert_nodes(
            &db,
            vec![person("Marie Curie", "Q7186"), person("Marie Curie", "Q7186")],
            10,
        )
        .await
        .unwrap();
        assert_eq!(n, 2);
        assert_eq!(node_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_upsert_fills_missing_fields() {
        let (db, _temp) = setup_store().await;

        let bare = NodeUpsert::person(PersonRecord {
            name: "Alice".to_string(),
            ..Default::default()
        });
        upsert_nodes(&db, vec![bare], 10).await.unwrap();

        let with_gender = NodeUpsert::person(PersonRecord {
            name: "Alice".to_string(),
            gender: Some("female".to_string()),
            ..Default::default()
        });
        upsert_nodes(&db, vec![with_gender], 10).await.unwrap();

        let gender: Option<String> = db
            .with_connection(|conn| {
                let g = conn.query_row(
                    "SELECT gender FROM nodes WHERE label = 'Person' AND name = 'Alice'",
                    [],
                    |r| r.get(0),
                )?;
                Ok::<Option<String>, NobelnetError>(g)
            })
            .await
            .unwrap();
        assert_eq!(gender.as_deref(), Some("female"));
    }

    #[tokio::test]
    async fn test_import_relations_links_existing_nodes() {
        let (db, _temp) = setup_store().await;
        upsert_nodes(
            &db,
            vec![person("Marie Curie", "Q7186"), statement("Q7186_1903")],
            10,
        )
        .await
        .unwrap();

        let summary = import_relations(
            &db,
            vec![RelationRow::new("Marie Curie", "RECEIVED", "Q7186_1903")],
            10,
        )
        .await
        .unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.missing_endpoints, 0);

        let triples = crate::source::from_store(&db).await.unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].relation, "RECEIVED");
    }

    #[tokio::test]
    async fn test_import_relations_missing_endpoint_skipped() {
        let (db, _temp) = setup_store().await;
        upsert_nodes(&db, vec![person("Marie Curie", "Q7186")], 10)
            .await
            .unwrap();

        let summary = import_relations(
            &db,
            vec![RelationRow::new("Marie Curie", "RECEIVED", "Q7186_1903")],
            10,
        )
        .await
        .unwrap();
        assert_eq!(summary.imported, 0);
        assert_eq!(summary.missing_endpoints, 1);
    }

    #[tokio::test]
    async fn test_import_relations_unknown_relation_fails() {
        let (db, _temp) = setup_store().await;
        let err = import_relations(
            &db,
            vec![RelationRow::new("A", "MENTIONED_IN", "B")],
            10,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, NobelnetError::UnknownRelation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_relations_collapse() {
        let (db, _temp) = setup_store().await;
        upsert_nodes(
            &db,
            vec![person("Marie Curie", "Q7186"), statement("Q7186_1903")],
            10,
        )
        .await
        .unwrap();

        let row = RelationRow::new("Marie Curie", "RECEIVED", "Q7186_1903");
        import_relations(&db, vec![row.clone(), row], 10).await.unwrap();

        let relation_count: i64 = db
            .with_connection(|conn| {
                let c: i64 =
                    conn.query_row("SELECT COUNT(*) FROM relations", [], |r| r.get(0))?;
                Ok::<i64, NobelnetError>(c)
            })
            .await
            .unwrap();
        assert_eq!(relation_count, 1);
    }

    #[tokio::test]
    async fn test_clear_store() {
        let (db, _temp) = setup_store().await;
        upsert_nodes(&db, vec![person("Marie Curie", "Q7186")], 10)
            .await
            .unwrap();
        clear_store(&db).await.unwrap();
        assert_eq!(node_count(&db).await, 0);
    }
}
