//! Error types for table construction

use thiserror::Error;

use crate::model::ColumnType;

/// Errors that abort table construction.
///
/// Construction is all-or-nothing: when any of these is returned no table
/// (and no partially filled column) is observable by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The format string contains a character that is not a type specifier.
    #[error("invalid format specifier '{specifier}' at position {position}")]
    InvalidSchema { specifier: char, position: usize },

    /// A field could not be read because the input ended first.
    #[error("truncated input at byte {offset}: {reason}")]
    TruncatedInput { offset: usize, reason: &'static str },

    /// The fill pass disagreed with the row count computed by the pre-scan.
    #[error("row count mismatch: pre-scan counted {counted} rows, fill pass saw {filled}")]
    RowCountMismatch { counted: usize, filled: usize },

    /// Strict mode: a numeric field is not a number.
    #[error("row {row}, column {column}: cannot parse {text:?} as {column_type}")]
    ValueParseFailure {
        row: usize,
        column: usize,
        text: String,
        column_type: ColumnType,
    },

    /// Strict mode: a numeric field does not fit the column's width.
    #[error("row {row}, column {column}: {text:?} is out of range for {column_type}")]
    ValueOutOfRange {
        row: usize,
        column: usize,
        text: String,
        column_type: ColumnType,
    },

    /// Delimiter or quote configuration cannot be tokenized.
    #[error("invalid parse options: {0}")]
    InvalidOptions(String),
}

/// Convenience alias used throughout the parsing core
pub type Result<T, E = ParseError> = std::result::Result<T, E>;
