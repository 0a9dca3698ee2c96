//! Error types for table construction.
//!
//! Evaluation never fails; only building a table from user-supplied points can.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Table needs at least two points (got {len})")]
    TooFewPoints { len: usize },

    #[error("Table x values must be strictly increasing (at index {index})")]
    NotIncreasing { index: usize },

    #[error("Non-finite table value at index {index}")]
    NonFinite { index: usize },

    #[error("Table is not invertible: y values must be strictly monotonic")]
    NotInvertible,
}

pub type TableResult<T> = Result<T, TableError>;

impl From<TableError> for ls_core::LsError {
    fn from(_: TableError) -> Self {
        ls_core::LsError::InvalidArg {
            what: "lookup table points",
        }
    }
}
