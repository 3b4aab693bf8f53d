use crate::{RunnerError, ShardOutput};
use std::fmt;
use tracing::{info, warn};
use traitscan_core::TraitDictionary;

/// All per-row results of a run. The order of rows is unspecified.
#[derive(Debug, Clone, Default)]
pub struct GlobalResults {
    pub trait_dictionaries: Vec<TraitDictionary>,
    pub remaining_counts: Vec<usize>,
}

impl GlobalResults {
    pub fn len(&self) -> usize {
        self.remaining_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_counts.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }

        100.0 * self.processed as f64 / self.total as f64
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Completed {:3.2} %", self.percent())
    }
}

/// Owns the [`GlobalResults`] of a run. Only the coordinator holds it, so merges are
/// serialised by `&mut self`.
#[derive(Debug)]
pub struct Aggregator {
    results: GlobalResults,
    total_rows: usize,
    merged_shards: usize,
    degenerate_rows: usize,
}

impl Aggregator {
    pub fn new(total_rows: usize) -> Self {
        Self {
            results: GlobalResults {
                trait_dictionaries: Vec::with_capacity(total_rows),
                remaining_counts: Vec::with_capacity(total_rows),
            },
            total_rows,
            merged_shards: 0,
            degenerate_rows: 0,
        }
    }

    pub fn merge(&mut self, output: ShardOutput) -> Progress {
        self.results
            .trait_dictionaries
            .extend(output.trait_dictionaries);
        self.results.remaining_counts.extend(output.remaining_counts);
        self.merged_shards += 1;
        self.degenerate_rows += output.degenerate_rows;

        let progress = self.progress();
        info!(shard = output.shard, "{}", progress);

        progress
    }

    pub fn progress(&self) -> Progress {
        Progress {
            processed: self.results.len(),
            total: self.total_rows,
        }
    }

    pub fn merged_shards(&self) -> usize {
        self.merged_shards
    }

    pub fn degenerate_rows(&self) -> usize {
        self.degenerate_rows
    }

    /// Hands out the results, refusing to do so if any row is missing.
    pub fn finish(self) -> Result<GlobalResults, RunnerError> {
        if self.results.len() != self.total_rows {
            return Err(RunnerError::IncompleteResults {
                merged: self.results.len(),
                expected: self.total_rows,
            });
        }

        if self.degenerate_rows > 0 {
            warn!(
                rows = self.degenerate_rows,
                "rows without any comparable trait"
            );
        }

        Ok(self.results)
    }
}
