use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown logical kind: {0}")]
    UnknownKind(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("column {column} has {actual} values, expected {expected}")]
    UnevenColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
}

pub type TypeResult<T> = Result<T, TypeError>;
