//! JSON export of the graph store: full node/relation dump and the compact
//! triplet form.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::db::Db;
use crate::error::{NobelnetError, Result};
use crate::source;

/// Full export of one store node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExport {
    pub node_id: i64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub born_on_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub died_on_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notable_work: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
}

/// Full export of one store relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationExport {
    pub relation_id: String,
    pub start_id: i64,
    pub relation: String,
    pub end_id: i64,
}

/// The whole store as one JSON document.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub relations: Vec<RelationExport>,
}

/// Compact triplet form: display names only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripletExport {
    pub start: String,
    pub relation: String,
    pub end: String,
}

/// Dump the full store to a pretty-printed JSON file. Returns the export
/// for callers that want counts.
pub async fn export_graph(db: &Db, path: &Path) -> Result<GraphExport> {
    let export = db
        .with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT node_id, label, name, wikidata_id, family_name, gender, \
                        born_on_date, died_on_date, notable_work, award_year, motivation \
                 FROM nodes ORDER BY node_id",
            )?;
            let node_rows = stmt
                .query_map([], |row| {
                    Ok(NodeExport {
                        node_id: row.get(0)?,
                        label: row.get(1)?,
                        name: row.get(2)?,
                        wikidata_id: row.get(3)?,
                        family_name: row.get(4)?,
                        gender: row.get(5)?,
                        born_on_date: row.get(6)?,
                        died_on_date: row.get(7)?,
                        notable_work: row.get(8)?,
                        award_year: row.get(9)?,
                        motivation: row.get(10)?,
                    })
                })
                .map_err(NobelnetError::Database)?;
            let mut nodes = Vec::new();
            for row in node_rows {
                nodes.push(row.map_err(NobelnetError::Database)?);
            }

            let mut stmt = conn.prepare(
                "SELECT relation_id, start_id, relation, end_id FROM relations ORDER BY rowid",
            )?;
            let relation_rows = stmt
                .query_map([], |row| {
                    Ok(RelationExport {
                        relation_id: row.get(0)?,
                        start_id: row.get(1)?,
                        relation: row.get(2)?,
                        end_id: row.get(3)?,
                    })
                })
                .map_err(NobelnetError::Database)?;
            let mut relations = Vec::new();
            for row in relation_rows {
                relations.push(row.map_err(NobelnetError::Database)?);
            }

            Ok(GraphExport { nodes, relations })
        })
        .await?;

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| NobelnetError::Parse(format!("Failed to serialize graph export: {}", e)))?;
    std::fs::write(path, json)?;

    log::info!(
        "Exported {} nodes and {} relations to {}",
        export.nodes.len(),
        export.relations.len(),
        path.display()
    );
    Ok(export)
}

/// Dump the store's relations as `[{start, relation, end}]` display-name
/// triplets. Returns the number of triplets written.
pub async fn export_triplets(db: &Db, path: &Path) -> Result<usize> {
    let triplets: Vec<TripletExport> = source::from_store(db)
        .await?
        .into_iter()
        .map(|t| TripletExport {
            start: t.start_name,
            relation: t.relation,
            end: t.end_name,
        })
        .collect();

    let json = serde_json::to_string_pretty(&triplets)
        .map_err(|e| NobelnetError::Parse(format!("Failed to serialize triplets: {}", e)))?;
    std::fs::write(path, json)?;

    log::info!("Exported {} triplets to {}", triplets.len(), path.display());
    Ok(triplets.len())
}
