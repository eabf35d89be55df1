//! Triple sources: drain relationship facts into memory for graph
//! construction, either live from the graph store or from a Relations.csv
//! staging file.

mod relations_csv;
mod store;

pub use relations_csv::from_relations_csv;
pub use store::from_store;

use serde::{Deserialize, Serialize};

use crate::schema;

/// One relationship fact: the unit of graph ingest.
///
/// `start_origin`/`end_origin` carry store identifiers when the source has
/// them; they are diagnostics only and never part of node identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleRecord {
    pub start_label: String,
    pub start_name: String,
    pub relation: String,
    pub end_label: String,
    pub end_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_origin: Option<String>,
}

impl TripleRecord {
    pub fn new(
        start_label: &str,
        start_name: &str,
        relation: &str,
        end_label: &str,
        end_name: &str,
    ) -> Self {
        Self {
            start_label: start_label.to_string(),
            start_name: start_name.to_string(),
            relation: relation.to_string(),
            end_label: end_label.to_string(),
            end_name: end_name.to_string(),
            start_origin: None,
            end_origin: None,
        }
    }

    /// Triple from a source that carries no label information; both
    /// endpoints get the generic `Entity` label.
    pub fn unlabeled(start_name: &str, relation: &str, end_name: &str) -> Self {
        Self::new(schema::ENTITY, start_name, relation, schema::ENTITY, end_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlabeled_uses_entity_label() {
        let t = TripleRecord::unlabeled("A", "RELATED_TO", "B");
        assert_eq!(t.start_label, "Entity");
        assert_eq!(t.end_label, "Entity");
        assert_eq!(t.relation, "RELATED_TO");
    }

    #[test]
    fn test_serde_omits_missing_origins() {
        let t = TripleRecord::new("Person", "A", "RECEIVED", "AwardStatement", "A_1920");
        let json = serde_json::to_string(&t).unwrap();
        assert!(!json.contains("start_origin"));
        let back: TripleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
