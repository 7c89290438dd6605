use thiserror::Error;

/// Rejected table edit. The snapshot it was applied to is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("'{0}' is not a number")]
    NotNumeric(String),

    #[error("Row {row} is out of range, the table has {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Year {0} is not a column of this table")]
    UnknownYear(String),
}
