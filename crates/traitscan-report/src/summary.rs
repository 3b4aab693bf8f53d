use itertools::Itertools;
use std::{cmp::Ordering, collections::HashMap};
use traitscan_core::TraitDictionary;

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSummary {
    pub threshold: usize,
    pub count: usize,
    pub percent: f64,
    pub average: f64,
    pub max: usize,
}

/// Summarises the remaining counts strictly above `threshold`. The percentage is taken over
/// all rows.
pub fn threshold_summary(remaining_counts: &[usize], threshold: usize) -> ThresholdSummary {
    let above: Vec<usize> = remaining_counts
        .iter()
        .copied()
        .filter(|count| *count > threshold)
        .collect();

    let count = above.len();
    let average = match count {
        0 => 0.0,
        _ => above.iter().sum::<usize>() as f64 / count as f64,
    };
    let percent = match remaining_counts.len() {
        0 => 0.0,
        rows => 100.0 * count as f64 / rows as f64,
    };

    ThresholdSummary {
        threshold,
        count,
        percent,
        average,
        max: above.iter().copied().max().unwrap_or(0),
    }
}

/// Percentile `q` (0 to 100) of ascending `sorted` values, interpolating linearly between
/// the two closest ranks.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let rank = (q / 100.0).clamp(0.0, 1.0) * (len - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;

            sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnsNeeded {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

pub fn columns_needed(trait_dictionaries: &[TraitDictionary]) -> ColumnsNeeded {
    let mut lengths: Vec<usize> = trait_dictionaries.iter().map(TraitDictionary::len).collect();
    lengths.sort_unstable();
    let values: Vec<f64> = lengths.iter().map(|length| *length as f64).collect();

    let mean = match values.len() {
        0 => 0.0,
        len => values.iter().sum::<f64>() / len as f64,
    };

    ColumnsNeeded {
        min: lengths.first().copied().unwrap_or(0),
        max: lengths.last().copied().unwrap_or(0),
        mean,
        p10: percentile(&values, 10.0),
        p25: percentile(&values, 25.0),
        p50: percentile(&values, 50.0),
        p75: percentile(&values, 75.0),
        p90: percentile(&values, 90.0),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnUsage {
    pub column: String,
    pub count: usize,
    pub percent: f64,
}

/// How many rows used each column, most used first.
pub fn column_usage(trait_dictionaries: &[TraitDictionary], rows: usize) -> Vec<ColumnUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for column in trait_dictionaries.iter().flat_map(|traits| traits.columns()) {
        *counts.entry(column).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .sorted_by(|a, b| by_count_then_name(a.1, b.1, &a.0, &b.0))
        .map(|(column, count)| ColumnUsage {
            column: column.to_string(),
            count,
            percent: percent_of(count, rows),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPair {
    pub first: String,
    pub second: String,
    pub count: usize,
    pub percent: f64,
}

/// Unordered column pairs used together for the same row, keeping pairs seen in more than
/// `min_percent` percent of rows. `first` sorts before `second`.
pub fn column_pairs(trait_dictionaries: &[TraitDictionary], min_percent: f64) -> Vec<ColumnPair> {
    let rows = trait_dictionaries.len();
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();

    for traits in trait_dictionaries {
        for pair in traits.columns().sorted().tuple_combinations::<(&str, &str)>() {
            *counts.entry(pair).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| percent_of(*count, rows) > min_percent)
        .sorted_by(|a, b| by_count_then_name(a.1, b.1, &a.0, &b.0))
        .map(|((first, second), count)| ColumnPair {
            first: first.to_string(),
            second: second.to_string(),
            count,
            percent: percent_of(count, rows),
        })
        .collect()
}

fn by_count_then_name<K: Ord>(a: usize, b: usize, a_key: &K, b_key: &K) -> Ordering {
    b.cmp(&a).then_with(|| a_key.cmp(b_key))
}

fn percent_of(count: usize, rows: usize) -> f64 {
    match rows {
        0 => 0.0,
        rows => 100.0 * count as f64 / rows as f64,
    }
}
