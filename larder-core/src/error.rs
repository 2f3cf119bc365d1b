use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}
