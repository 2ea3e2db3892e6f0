use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Input file not found at {0}")]
    NotFound(String),

    #[error("No papers found in the input file")]
    EmptyCollection,

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
