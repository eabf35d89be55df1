//! Staged CSV input for the import stage.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::extract::records::RelationRow;
use crate::extract::{node_csv_path, StagedNodes};
use crate::schema;

/// Read every record of a staged CSV; a missing file yields an empty set,
/// since extract only writes files for non-empty node types.
fn read_csv_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        log::debug!("No staged file at {}", path.display());
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize::<T>() {
        records.push(record?);
    }
    Ok(records)
}

/// Read all staged node CSVs under `dir`.
pub fn read_staged_nodes(dir: &Path) -> Result<StagedNodes> {
    let nodes = StagedNodes {
        people: read_csv_records(&node_csv_path(dir, schema::PERSON))?,
        awards: read_csv_records(&node_csv_path(dir, schema::AWARD))?,
        statements: read_csv_records(&node_csv_path(dir, schema::AWARD_STATEMENT))?,
        countries: read_csv_records(&node_csv_path(dir, schema::COUNTRY))?,
        occupations: read_csv_records(&node_csv_path(dir, schema::OCCUPATION))?,
        fields: read_csv_records(&node_csv_path(dir, schema::FIELD))?,
        organizations: read_csv_records(&node_csv_path(dir, schema::ORGANIZATION))?,
        positions: read_csv_records(&node_csv_path(dir, schema::POSITION))?,
    };
    log::info!("Read {} staged node records from {}", nodes.total(), dir.display());
    Ok(nodes)
}

/// Read the staged Relations.csv. Unlike node CSVs, a missing relations
/// file is an error: a store with nodes but no relations answers nothing.
pub fn read_relation_rows(path: &Path) -> Result<Vec<RelationRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize::<RelationRow>() {
        rows.push(row?);
    }
    log::info!("Read {} relation rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::records::{NamedRecord, PersonRecord};
    use crate::extract::{write_nodes, write_relations, relations_csv_path};
    use tempfile::TempDir;

    #[test]
    fn test_read_staged_nodes_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut nodes = StagedNodes::default();
        nodes.people.push(PersonRecord {
            name: "Alice".to_string(),
            id: Some("Q1".to_string()),
            ..Default::default()
        });
        nodes.organizations.push(NamedRecord { name: "Sorbonne".to_string() });
        write_nodes(temp.path(), &nodes).unwrap();

        let back = read_staged_nodes(temp.path()).unwrap();
        assert_eq!(back.people, nodes.people);
        assert_eq!(back.organizations, nodes.organizations);
        // Types extract never wrote come back empty
        assert!(back.awards.is_empty());
        assert!(back.positions.is_empty());
    }

    #[test]
    fn test_read_relation_rows_round_trip() {
        let temp = TempDir::new().unwrap();
        let rows = vec![RelationRow::new("Alice", "RECEIVED", "Q1_1950")];
        write_relations(temp.path(), &rows).unwrap();

        let back = read_relation_rows(&relations_csv_path(temp.path())).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_missing_relations_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(read_relation_rows(&relations_csv_path(temp.path())).is_err());
    }
}
