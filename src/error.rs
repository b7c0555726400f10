#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collection '{collection}' has no cards list")]
    MissingCards { collection: String },

    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, CollectorError>;
