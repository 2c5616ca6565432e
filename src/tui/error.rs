//! Widget errors
//!
//! A cell that cannot be addressed or formatted renders as a marker instead
//! of aborting the frame.

/// A cell the table widgets could not produce
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TuiError {
    /// Row index past the last row
    #[error("Row {row} is past the end of the table ({rows} rows)")]
    RowOutOfBounds {
        /// Requested row
        row: usize,
        /// Rows in the table
        rows: usize,
    },
    /// Column index past the last column
    #[error("Column {column} is past the last column ({columns} columns)")]
    ColumnOutOfBounds {
        /// Requested column
        column: usize,
        /// Columns in the table
        columns: usize,
    },
    /// Arrow has no display form for the value
    #[error("Cannot display the value in row {row}: {reason}")]
    Unformattable {
        /// Row of the value
        row: usize,
        /// Arrow's explanation
        reason: String,
    },
}

/// Result type for widget operations
pub type TuiResult<T> = Result<T, TuiError>;
