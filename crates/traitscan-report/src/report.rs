use crate::summary::{
    column_pairs, column_usage, columns_needed, threshold_summary, ColumnPair, ColumnUsage,
    ColumnsNeeded, ThresholdSummary,
};
use std::fmt;
use traitscan_core::TraitDictionary;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub threshold: usize,
    pub min_pair_percent: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            threshold: 1,
            min_pair_percent: 1.0,
        }
    }
}

/// The summary statistics of a finished run. Independent of the order the rows were merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub threshold: ThresholdSummary,
    pub columns_needed: ColumnsNeeded,
    pub column_usage: Vec<ColumnUsage>,
    pub column_pairs: Vec<ColumnPair>,
}

impl Report {
    pub fn build(
        trait_dictionaries: &[TraitDictionary],
        remaining_counts: &[usize],
        options: &ReportOptions,
    ) -> Self {
        Self {
            threshold: threshold_summary(remaining_counts, options.threshold),
            columns_needed: columns_needed(trait_dictionaries),
            column_usage: column_usage(trait_dictionaries, remaining_counts.len()),
            column_pairs: column_pairs(trait_dictionaries, options.min_pair_percent),
        }
    }

    pub fn render(&self, input_name: &str) -> String {
        format!("Input file = {}\n{}", input_name, self)
    }

    fn write_threshold(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.threshold;

        writeln!(f)?;
        writeln!(f, "Threshold = {}", summary.threshold)?;
        writeln!(f, "Count above threshold = {}", summary.count)?;
        writeln!(f, "Percent above threshold = {:3.2}%", summary.percent)?;
        writeln!(
            f,
            "Average value of those above threshold = {:3.2}",
            summary.average
        )?;
        writeln!(f, "Max value of those above threshold = {}", summary.max)
    }

    fn write_columns_needed(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let needed = &self.columns_needed;

        writeln!(f)?;
        writeln!(f, "Number of columns needed to uniquely identify a row:")?;
        writeln!(f, "Mean = {:3.2}", needed.mean)?;
        writeln!(f, "Max = {}", needed.max)?;
        writeln!(f, "Min = {}", needed.min)?;
        writeln!(f, "10th percentile = {:?}", needed.p10)?;
        writeln!(f, "25th percentile = {:?}", needed.p25)?;
        writeln!(f, "50th percentile = {:?}", needed.p50)?;
        writeln!(f, "75th percentile = {:?}", needed.p75)?;
        writeln!(f, "90th percentile = {:?}", needed.p90)
    }

    fn write_column_usage(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Columns used to identify rows:")?;
        writeln!(f, "Column name\tPercent of rows")?;

        for usage in &self.column_usage {
            writeln!(f, "{}\t{:3.2}%", usage.column, usage.percent)?;
        }

        Ok(())
    }

    fn write_column_pairs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Columns frequently used together to identify rows:")?;
        writeln!(f, "Column set\tFrequency")?;

        for pair in &self.column_pairs {
            writeln!(
                f,
                "({}, {})\t{:3.2}%",
                pair.first, pair.second, pair.percent
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_threshold(f)?;
        self.write_columns_needed(f)?;
        self.write_column_usage(f)?;
        self.write_column_pairs(f)
    }
}
