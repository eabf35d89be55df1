//! Entity labels and the declarative relation schema.
//!
//! Every relation label the pipeline knows maps to exactly one
//! (start label, end label) pair. Import and CSV triple sources resolve
//! endpoint labels through this table; an unknown relation label is a
//! reportable error, never a silent skip.

use crate::error::{NobelnetError, Result};

pub const PERSON: &str = "Person";
pub const AWARD: &str = "Award";
pub const AWARD_STATEMENT: &str = "AwardStatement";
pub const COUNTRY: &str = "Country";
pub const OCCUPATION: &str = "Occupation";
pub const FIELD: &str = "Field";
pub const ORGANIZATION: &str = "Organization";
pub const POSITION: &str = "Position";

/// Fallback label for triple sources that carry no label information.
pub const ENTITY: &str = "Entity";

/// All entity labels the store can hold.
pub const ENTITY_LABELS: &[&str] = &[
    PERSON,
    AWARD,
    AWARD_STATEMENT,
    COUNTRY,
    OCCUPATION,
    FIELD,
    ORGANIZATION,
    POSITION,
];

/// One row of the relation schema: relation label plus endpoint labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationRule {
    pub relation: &'static str,
    pub start_label: &'static str,
    pub end_label: &'static str,
}

/// The relation schema. Order matches the extract stage's output order.
pub const RELATION_RULES: &[RelationRule] = &[
    RelationRule { relation: "RECEIVED", start_label: PERSON, end_label: AWARD_STATEMENT },
    RelationRule { relation: "IS_INSTANCE_OF", start_label: AWARD_STATEMENT, end_label: AWARD },
    RelationRule { relation: "IS_CITIZEN_OF", start_label: PERSON, end_label: COUNTRY },
    RelationRule { relation: "WORKS_AS", start_label: PERSON, end_label: OCCUPATION },
    RelationRule { relation: "WORKS_IN_FIELD", start_label: PERSON, end_label: FIELD },
    RelationRule { relation: "EDUCATED_AT", start_label: PERSON, end_label: ORGANIZATION },
    RelationRule { relation: "EMPLOYED_BY", start_label: PERSON, end_label: ORGANIZATION },
    RelationRule { relation: "IS_MEMBER_OF", start_label: PERSON, end_label: ORGANIZATION },
    RelationRule { relation: "HOLDS_POSITION", start_label: PERSON, end_label: POSITION },
];

/// Look up the rule for a relation label.
pub fn rule_for(relation: &str) -> Result<&'static RelationRule> {
    RELATION_RULES
        .iter()
        .find(|r| r.relation == relation)
        .ok_or_else(|| NobelnetError::UnknownRelation(relation.to_string()))
}

/// Check the schema table itself: endpoint labels must be known entity
/// labels and relation labels must be unique. Run once at startup by the
/// import stage.
pub fn validate() -> Result<()> {
    for rule in RELATION_RULES {
        if !ENTITY_LABELS.contains(&rule.start_label) {
            return Err(NobelnetError::Config(format!(
                "relation {} has unknown start label {}",
                rule.relation, rule.start_label
            )));
        }
        if !ENTITY_LABELS.contains(&rule.end_label) {
            return Err(NobelnetError::Config(format!(
                "relation {} has unknown end label {}",
                rule.relation, rule.end_label
            )));
        }
        let occurrences = RELATION_RULES
            .iter()
            .filter(|r| r.relation == rule.relation)
            .count();
        if occurrences != 1 {
            return Err(NobelnetError::Config(format!(
                "relation {} appears {} times in the schema",
                rule.relation, occurrences
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_valid() {
        validate().unwrap();
    }

    #[test]
    fn test_rule_for_known_relation() {
        let rule = rule_for("RECEIVED").unwrap();
        assert_eq!(rule.start_label, PERSON);
        assert_eq!(rule.end_label, AWARD_STATEMENT);

        let rule = rule_for("IS_INSTANCE_OF").unwrap();
        assert_eq!(rule.start_label, AWARD_STATEMENT);
        assert_eq!(rule.end_label, AWARD);
    }

    #[test]
    fn test_rule_for_unknown_relation() {
        let err = rule_for("MENTIONED_IN").unwrap_err();
        assert!(matches!(err, NobelnetError::UnknownRelation(_)));
        assert!(err.to_string().contains("MENTIONED_IN"));
    }

    #[test]
    fn test_all_org_relations_target_organization() {
        for rel in ["EDUCATED_AT", "EMPLOYED_BY", "IS_MEMBER_OF"] {
            assert_eq!(rule_for(rel).unwrap().end_label, ORGANIZATION);
        }
    }
}
