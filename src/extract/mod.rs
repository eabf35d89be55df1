//! Extract stage: reshape the flat award export into staged node and
//! relation CSVs for the import stage.

pub mod records;
mod reshape;
mod writer;

pub use records::{
    AwardRecord, AwardRow, AwardStatementRecord, NamedRecord, PersonRecord, RelationRow,
};
pub use reshape::{reshape, ExtractOutput, StagedNodes};
pub use writer::{node_csv_path, relations_csv_path, write_nodes, write_relations};
