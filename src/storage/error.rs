use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table already exists: {0}")]
    TableExists(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("First field must be an integer key")]
    NonIntegerKey,

    #[error("Key not found: {0}")]
    KeyNotFound(i32),

    #[error("Record too large for a page: {0} bytes")]
    RecordTooLarge(usize),
}
