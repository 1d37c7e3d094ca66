use thiserror::Error;

#[derive(Debug, Error)]
pub enum OncographError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Row has {found} cells, table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    #[error("Conflicting value for property '{key}' on {label} node '{id}'")]
    ConflictingProperty { label: String, id: String, key: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OncographError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        OncographError::MissingColumn { column: column.into() }
    }
}

pub type Result<T> = std::result::Result<T, OncographError>;
