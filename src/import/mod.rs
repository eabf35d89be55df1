//! Import stage: batch upload of staged node and relation CSVs into the
//! graph store.

mod reader;
mod runs;
mod uploader;

pub use reader::{read_relation_rows, read_staged_nodes};
pub use runs::{compute_file_hash, last_run_hash, record_run, run_history, ImportRun};
pub use uploader::{
    clear_store, import_relations, upsert_nodes, NodeUpsert, RelationImportSummary,
};
