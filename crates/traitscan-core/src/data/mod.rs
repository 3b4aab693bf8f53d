mod arrow;
mod dataset;
mod value;

pub use self::arrow::{read_csv, record_batches_to_dataset, INFER_SCHEMA_RECORDS, MISSING_PATTERN};
pub use self::dataset::{Column, ColumnBuilder, Dataset};
pub use self::value::Value;
