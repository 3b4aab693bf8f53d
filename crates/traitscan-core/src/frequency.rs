use crate::data::{Column, Dataset, Value};
use std::collections::HashMap;

/// Relative frequencies of the values of one column within a set of rows.
///
/// Missing values are not counted, so the frequencies sum to one over the observed values.
#[derive(Debug, Clone, Default)]
pub struct ValueFrequencies {
    counts: HashMap<u32, usize>,
    observed: usize,
}

impl ValueFrequencies {
    fn count(column: &Column, rows: &[usize]) -> Self {
        let mut frequencies = Self::default();

        for code in rows.iter().filter_map(|row| column.code(*row)) {
            *frequencies.counts.entry(code).or_insert(0) += 1;
            frequencies.observed += 1;
        }

        frequencies
    }

    pub fn frequency(&self, code: u32) -> Option<f64> {
        self.counts
            .get(&code)
            .map(|count| *count as f64 / self.observed as f64)
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn observed(&self) -> usize {
        self.observed
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.counts
            .iter()
            .map(move |(code, count)| (*code, *count as f64 / self.observed as f64))
    }

    /// Resolves the codes against the column dictionary they were counted from.
    pub fn values<'a>(&'a self, column: &'a Column) -> impl Iterator<Item = (&'a Value, f64)> + 'a {
        self.iter()
            .map(move |(code, frequency)| (column.decode(code), frequency))
    }
}

/// One [`ValueFrequencies`] per dataset column, computed over a candidate set of rows.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    columns: Vec<ValueFrequencies>,
}

impl FrequencyTable {
    pub fn compute(dataset: &Dataset, rows: &[usize]) -> Self {
        Self {
            columns: dataset
                .columns()
                .iter()
                .map(|column| ValueFrequencies::count(column, rows))
                .collect(),
        }
    }

    pub fn column(&self, index: usize) -> &ValueFrequencies {
        &self.columns[index]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `false` once every column is constant (or entirely missing) across the rows.
    pub fn can_split(&self) -> bool {
        self.columns.iter().any(|column| column.distinct() > 1)
    }
}
