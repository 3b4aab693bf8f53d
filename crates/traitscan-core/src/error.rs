use arrow::datatypes::DataType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error("dataset has no rows or no columns")]
    EmptyDataset,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column {name} has {actual} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} is out of range for a dataset with {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("could not read array of type {0}")]
    Downcast(DataType),
}
