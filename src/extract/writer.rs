//! Staged CSV output: one file per entity label plus Relations.csv.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::schema;

use super::records::RelationRow;
use super::reshape::StagedNodes;

/// File name for a node label's staged CSV.
pub fn node_csv_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{}.csv", label))
}

/// File name of the staged relations CSV.
pub fn relations_csv_path(dir: &Path) -> PathBuf {
    dir.join("Relations.csv")
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every non-empty node set to `<label>.csv` under `dir`.
pub fn write_nodes(dir: &Path, nodes: &StagedNodes) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    if !nodes.people.is_empty() {
        write_records(&node_csv_path(dir, schema::PERSON), &nodes.people)?;
    }
    if !nodes.awards.is_empty() {
        write_records(&node_csv_path(dir, schema::AWARD), &nodes.awards)?;
    }
    if !nodes.statements.is_empty() {
        write_records(&node_csv_path(dir, schema::AWARD_STATEMENT), &nodes.statements)?;
    }
    if !nodes.countries.is_empty() {
        write_records(&node_csv_path(dir, schema::COUNTRY), &nodes.countries)?;
    }
    if !nodes.occupations.is_empty() {
        write_records(&node_csv_path(dir, schema::OCCUPATION), &nodes.occupations)?;
    }
    if !nodes.fields.is_empty() {
        write_records(&node_csv_path(dir, schema::FIELD), &nodes.fields)?;
    }
    if !nodes.organizations.is_empty() {
        write_records(&node_csv_path(dir, schema::ORGANIZATION), &nodes.organizations)?;
    }
    if !nodes.positions.is_empty() {
        write_records(&node_csv_path(dir, schema::POSITION), &nodes.positions)?;
    }

    log::info!("Wrote {} staged node records to {}", nodes.total(), dir.display());
    Ok(())
}

/// Write Relations.csv under `dir`.
pub fn write_relations(dir: &Path, relations: &[RelationRow]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_records(&relations_csv_path(dir), relations)?;
    log::info!("Wrote {} relation rows to {}", relations.len(), dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::records::{NamedRecord, PersonRecord};
    use tempfile::TempDir;

    #[test]
    fn test_write_nodes_skips_empty_sets() {
        let temp = TempDir::new().unwrap();
        let mut nodes = StagedNodes::default();
        nodes.people.push(PersonRecord {
            name: "Alice".to_string(),
            id: Some("Q1".to_string()),
            ..Default::default()
        });
        nodes.countries.push(NamedRecord { name: "France".to_string() });

        write_nodes(temp.path(), &nodes).unwrap();

        assert!(node_csv_path(temp.path(), "Person").exists());
        assert!(node_csv_path(temp.path(), "Country").exists());
        assert!(!node_csv_path(temp.path(), "Award").exists());
    }

    #[test]
    fn test_person_csv_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut nodes = StagedNodes::default();
        nodes.people.push(PersonRecord {
            name: "Alice".to_string(),
            id: Some("Q1".to_string()),
            gender: Some("female".to_string()),
            ..Default::default()
        });
        write_nodes(temp.path(), &nodes).unwrap();

        let mut reader = csv::Reader::from_path(node_csv_path(temp.path(), "Person")).unwrap();
        let people: Vec<PersonRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(people, nodes.people);
    }

    #[test]
    fn test_write_relations() {
        let temp = TempDir::new().unwrap();
        let relations = vec![
            RelationRow::new("Alice", "RECEIVED", "Q1_1950"),
            RelationRow::new("Q1_1950", "IS_INSTANCE_OF", "Prize"),
        ];
        write_relations(temp.path(), &relations).unwrap();

        let mut reader = csv::Reader::from_path(relations_csv_path(temp.path())).unwrap();
        let back: Vec<RelationRow> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(back, relations);
    }
}
