use thiserror::Error;

/// Main error type for nobelnet
#[derive(Error, Debug)]
pub enum NobelnetError {
    /// Graph store errors
    #[error("Store error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed source data that cannot be skipped locally
    #[error("Parse error: {0}")]
    Parse(String),

    /// Relation label missing from the relation schema
    #[error("Unknown relation type: {0}")]
    UnknownRelation(String),

    /// No Person node matches the query string
    #[error("No person matching '{0}'")]
    PersonNotFound(String),

    /// Both endpoints exist but lie in disconnected components
    #[error("No path between '{from}' and '{to}'")]
    NoPath { from: String, to: String },

    /// A path endpoint is not a node of the queried graph
    #[error("Node not in graph: {0}")]
    MissingEndpoint(String),

    /// Traversal step budget exhausted before the target was reached
    #[error("Traversal budget exhausted after {0} steps")]
    BudgetExhausted(usize),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using NobelnetError
pub type Result<T> = std::result::Result<T, NobelnetError>;
