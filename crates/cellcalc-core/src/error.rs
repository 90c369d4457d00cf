//! Error types for cellcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellcalc-core
///
/// These are structural failures (bad addresses, rejected edits). Cell-level
/// evaluation failures are carried as [`CellError`](crate::CellError) values instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range format
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (row count: {1})")]
    RowOutOfBounds(usize, usize),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (column count: {1})")]
    ColumnOutOfBounds(usize, usize),

    /// Deleting would leave the sheet without rows
    #[error("Cannot delete the last remaining row")]
    LastRow,

    /// Deleting would leave the sheet without columns
    #[error("Cannot delete the last remaining column")]
    LastColumn,
}
