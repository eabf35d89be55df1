pub mod config;
pub mod error;
pub mod db;
pub mod schema;
pub mod extract;
pub mod import;
pub mod source;
pub mod graph;
pub mod export;

pub use config::Config;
pub use error::{NobelnetError, Result};
pub use graph::{find_person, format_path, shortest_path, Graph, GraphBuilder, Node, PathStep};
pub use source::TripleRecord;
