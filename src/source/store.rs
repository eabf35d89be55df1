//! Live triple source: drain every relation in the graph store.

use crate::db::Db;
use crate::error::{NobelnetError, Result};

use super::TripleRecord;

/// Read all relations with their endpoint nodes, fully into memory.
///
/// The display name falls back through `name`, then `wikidata_id`, then the
/// store-assigned node id, so a node always has a printable identity.
pub async fn from_store(db: &Db) -> Result<Vec<TripleRecord>> {
    let triples = db
        .with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT s.label, \
                        COALESCE(s.name, s.wikidata_id, CAST(s.node_id AS TEXT)), \
                        s.node_id, \
                        r.relation, \
                        t.label, \
                        COALESCE(t.name, t.wikidata_id, CAST(t.node_id AS TEXT)), \
                        t.node_id \
                 FROM relations r \
                 JOIN nodes s ON s.node_id = r.start_id \
                 JOIN nodes t ON t.node_id = r.end_id \
                 ORDER BY r.rowid",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(TripleRecord {
                        start_label: row.get(0)?,
                        start_name: row.get(1)?,
                        start_origin: Some(row.get::<_, i64>(2)?.to_string()),
                        relation: row.get(3)?,
                        end_label: row.get(4)?,
                        end_name: row.get(5)?,
                        end_origin: Some(row.get::<_, i64>(6)?.to_string()),
                    })
                })
                .map_err(NobelnetError::Database)?;
            let mut out = Vec::new();
            for row in rows {
                out.push(row.map_err(NobelnetError::Database)?);
            }
            Ok(out)
        })
        .await?;

    log::info!("Drained {} triples from store", triples.len());
    Ok(triples)
}
