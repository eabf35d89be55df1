//! Row types for the raw award export and the staged node/relation CSVs.
//!
//! Node records are fixed-shape per entity type: every optional field is
//! enumerated here, columns the export may carry beyond these are ignored
//! at the CSV layer and logged by the extract bin.

use serde::{Deserialize, Serialize};

/// One row of the raw Wikidata award export.
///
/// `laureate`/`award` are entity URIs; the multi-value columns hold
/// comma-separated lists.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardRow {
    pub laureate: String,
    #[serde(rename = "laureateName")]
    pub laureate_name: String,
    pub award: String,
    #[serde(rename = "awardName")]
    pub award_name: String,
    pub year: String,
    #[serde(default)]
    pub has_motivation: Option<String>,
    #[serde(default)]
    pub has_family_name: Option<String>,
    #[serde(default)]
    pub has_gender: Option<String>,
    #[serde(default)]
    pub born_on_date: Option<String>,
    #[serde(default)]
    pub died_on_date: Option<String>,
    #[serde(default)]
    pub has_notable_work: Option<String>,
    #[serde(default)]
    pub is_citizen_of: Option<String>,
    #[serde(default)]
    pub works_as: Option<String>,
    #[serde(default)]
    pub works_in_field: Option<String>,
    #[serde(default)]
    pub educated_at: Option<String>,
    #[serde(default)]
    pub employed_by: Option<String>,
    #[serde(default)]
    pub is_member_of: Option<String>,
    #[serde(default)]
    pub holds_position: Option<String>,
}

/// Person node record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub id: Option<String>,
    pub family_name: Option<String>,
    pub gender: Option<String>,
    pub born_on_date: Option<String>,
    pub died_on_date: Option<String>,
    pub notable_work: Option<String>,
}

/// Award node record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwardRecord {
    pub name: String,
    pub id: Option<String>,
}

/// AwardStatement node record: one concrete conferral, named
/// `<person_id>_<year>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwardStatementRecord {
    pub name: String,
    pub year: Option<String>,
    pub motivation: Option<String>,
}

/// Name-only node record (Country, Occupation, Field, Organization,
/// Position).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub name: String,
}

/// One row of Relations.csv: `(start_id, relation, end_name)`. Endpoint
/// labels are implied by the relation schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRow {
    pub start_id: String,
    pub relation: String,
    pub end_name: String,
}

impl RelationRow {
    pub fn new(start_id: &str, relation: &str, end_name: &str) -> Self {
        Self {
            start_id: start_id.to_string(),
            relation: relation.to_string(),
            end_name: end_name.to_string(),
        }
    }
}
