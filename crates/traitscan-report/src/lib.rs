mod report;
mod summary;

pub use crate::report::{Report, ReportOptions};
pub use crate::summary::{
    column_pairs, column_usage, columns_needed, percentile, threshold_summary, ColumnPair,
    ColumnUsage, ColumnsNeeded, ThresholdSummary,
};
