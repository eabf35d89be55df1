//! Reshape the flat award export into staged node and relation records.

use std::collections::{HashMap, HashSet};
use std::io::Read;

use regex::Regex;

use crate::error::Result;

use super::records::{
    AwardRecord, AwardRow, AwardStatementRecord, NamedRecord, PersonRecord, RelationRow,
};

/// Deduplicated node records per entity type, in first-seen order.
#[derive(Debug, Default)]
pub struct StagedNodes {
    pub people: Vec<PersonRecord>,
    pub awards: Vec<AwardRecord>,
    pub statements: Vec<AwardStatementRecord>,
    pub countries: Vec<NamedRecord>,
    pub occupations: Vec<NamedRecord>,
    pub fields: Vec<NamedRecord>,
    pub organizations: Vec<NamedRecord>,
    pub positions: Vec<NamedRecord>,
}

impl StagedNodes {
    pub fn total(&self) -> usize {
        self.people.len()
            + self.awards.len()
            + self.statements.len()
            + self.countries.len()
            + self.occupations.len()
            + self.fields.len()
            + self.organizations.len()
            + self.positions.len()
    }
}

/// Result of one reshape pass over the raw export.
#[derive(Debug, Default)]
pub struct ExtractOutput {
    pub nodes: StagedNodes,
    pub relations: Vec<RelationRow>,
    /// Raw rows read.
    pub rows: usize,
    /// Rows or node references skipped for an empty identity field.
    pub dropped: usize,
}

/// Insertion-order set of name-only records.
#[derive(Default)]
struct NamedSet {
    seen: HashSet<String>,
    records: Vec<NamedRecord>,
}

impl NamedSet {
    fn add(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || self.seen.contains(name) {
            return;
        }
        self.seen.insert(name.to_string());
        self.records.push(NamedRecord { name: name.to_string() });
    }
}

/// Reshape the raw export read from `reader` into staged records.
///
/// Rows without a laureate name are skipped and counted; missing optional
/// columns become absent fields, never errors.
pub fn reshape<R: Read>(reader: R) -> Result<ExtractOutput> {
    let entity_re = Regex::new(r"Q\d+$").expect("Invalid regex pattern");

    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut out = ExtractOutput::default();
    let mut person_index: HashMap<String, usize> = HashMap::new();
    let mut award_index: HashMap<String, usize> = HashMap::new();
    let mut statement_index: HashMap<String, usize> = HashMap::new();
    let mut countries = NamedSet::default();
    let mut occupations = NamedSet::default();
    let mut fields = NamedSet::default();
    let mut organizations = NamedSet::default();
    let mut positions = NamedSet::default();

    for row in csv_reader.deserialize::<AwardRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                out.dropped += 1;
                log::warn!("Skipping malformed export row: {}", e);
                continue;
            }
        };
        out.rows += 1;

        let person_name = row.laureate_name.trim().to_string();
        if person_name.is_empty() {
            out.dropped += 1;
            log::warn!("Skipping row without a laureate name");
            continue;
        }

        let person_id = entity_id(&entity_re, &row.laureate);
        let award_name = row.award_name.trim().to_string();
        let year = row.year.trim().to_string();
        let statement_name = format!("{}_{}", person_id, year);

        // Person node, extra fields merged into the first-seen record
        let person = PersonRecord {
            name: person_name.clone(),
            id: Some(person_id.clone()),
            family_name: non_empty(row.has_family_name.as_deref()),
            gender: non_empty(row.has_gender.as_deref()),
            born_on_date: non_empty(row.born_on_date.as_deref()),
            died_on_date: non_empty(row.died_on_date.as_deref()),
            notable_work: non_empty(row.has_notable_work.as_deref()),
        };
        match person_index.get(&person_name) {
            Some(&i) => merge_person(&mut out.nodes.people[i], person),
            None => {
                person_index.insert(person_name.clone(), out.nodes.people.len());
                out.nodes.people.push(person);
            }
        }

        // AwardStatement node
        if !statement_index.contains_key(&statement_name) {
            statement_index.insert(statement_name.clone(), out.nodes.statements.len());
            out.nodes.statements.push(AwardStatementRecord {
                name: statement_name.clone(),
                year: non_empty(Some(&year)),
                motivation: row
                    .has_motivation
                    .as_deref()
                    .map(|m| m.replace('\n', " ").trim().to_string())
                    .filter(|m| !m.is_empty()),
            });
        }
        out.relations
            .push(RelationRow::new(&person_name, "RECEIVED", &statement_name));

        // Award node and the statement's instance-of link
        if award_name.is_empty() {
            out.dropped += 1;
            log::warn!("Row for {} has no award name", person_name);
        } else {
            if !award_index.contains_key(&award_name) {
                award_index.insert(award_name.clone(), out.nodes.awards.len());
                out.nodes.awards.push(AwardRecord {
                    name: award_name.clone(),
                    id: Some(entity_id(&entity_re, &row.award)),
                });
            }
            out.relations.push(RelationRow::new(
                &statement_name,
                "IS_INSTANCE_OF",
                &award_name,
            ));
        }

        // Multi-value columns, one node and relation per element
        let handle_list =
            |value: Option<&str>, set: &mut NamedSet, relation: &str, rels: &mut Vec<RelationRow>| {
                let Some(value) = value else { return };
                for element in value.split(',') {
                    let element = element.trim();
                    if element.is_empty() {
                        continue;
                    }
                    set.add(element);
                    rels.push(RelationRow::new(&person_name, relation, element));
                }
            };

        handle_list(row.is_citizen_of.as_deref(), &mut countries, "IS_CITIZEN_OF", &mut out.relations);
        handle_list(row.works_as.as_deref(), &mut occupations, "WORKS_AS", &mut out.relations);
        handle_list(row.works_in_field.as_deref(), &mut fields, "WORKS_IN_FIELD", &mut out.relations);
        handle_list(row.educated_at.as_deref(), &mut organizations, "EDUCATED_AT", &mut out.relations);
        handle_list(row.employed_by.as_deref(), &mut organizations, "EMPLOYED_BY", &mut out.relations);
        handle_list(row.is_member_of.as_deref(), &mut organizations, "IS_MEMBER_OF", &mut out.relations);
        handle_list(row.holds_position.as_deref(), &mut positions, "HOLDS_POSITION", &mut out.relations);
    }

    out.nodes.countries = countries.records;
    out.nodes.occupations = occupations.records;
    out.nodes.fields = fields.records;
    out.nodes.organizations = organizations.records;
    out.nodes.positions = positions.records;

    log::info!(
        "Reshaped {} rows into {} nodes and {} relations ({} dropped)",
        out.rows,
        out.nodes.total(),
        out.relations.len(),
        out.dropped
    );
    Ok(out)
}

/// Trailing Wikidata entity id of a URI, or the raw tail when it doesn't
/// look like one.
fn entity_id(re: &Regex, uri: &str) -> String {
    let tail = uri.rsplit('/').next().unwrap_or(uri).trim();
    if !re.is_match(tail) {
        log::debug!("Entity URI tail {:?} is not a Qid, keeping as-is", tail);
    }
    tail.to_string()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Fill fields the first-seen record is missing; first non-empty value wins.
fn merge_person(existing: &mut PersonRecord, fresh: PersonRecord) {
    if existing.id.is_none() {
        existing.id = fresh.id;
    }
    if existing.family_name.is_none() {
        existing.family_name = fresh.family_name;
    }
    if existing.gender.is_none() {
        existing.gender = fresh.gender;
    }
    if existing.born_on_date.is_none() {
        existing.born_on_date = fresh.born_on_date;
    }
    if existing.died_on_date.is_none() {
        existing.died_on_date = fresh.died_on_date;
    }
    if existing.notable_work.is_none() {
        existing.notable_work = fresh.notable_work;
    }
}
